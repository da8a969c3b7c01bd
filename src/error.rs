/// Errors raised by the lifetime engine and its collaborators
///
/// Per-sample estimation failures are not errors: they are carried in the output series as
/// [`crate::series::Lifetime::Gap`] so a handful of bad samples never abort a run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid configuration: gas mixture, smoothing window or malformed config file
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A physical parameter outside the range where a model is defined
    #[error("domain error: {0}")]
    Domain(String),

    /// A series which violates the ordering or non-emptiness invariants
    #[error("invalid series: {0}")]
    InvalidSeries(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Fail with a [`Error::Domain`] unless `value` is finite and strictly positive
pub(crate) fn require_positive(name: &str, value: f64) -> crate::Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::domain(format!("{name} must be positive and finite, got {value}")))
    }
}
