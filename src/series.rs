use chrono::NaiveDateTime;

use crate::{Error, Result};

/// One telemetry reading
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// A tagged series of samples with strictly increasing timestamps
///
/// Every processing stage returns a fresh series; a series is never mutated once built.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeries {
    tag: String,
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// # Errors
    /// Returns [`Error::InvalidSeries`] if the timestamps are not strictly increasing.
    pub fn new(tag: impl Into<String>, samples: Vec<Sample>) -> Result<Self> {
        if let Some(index) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(Error::InvalidSeries(format!(
                "timestamp at sample {} ({}) does not follow {}",
                index + 1,
                samples[index + 1].timestamp,
                samples[index].timestamp
            )));
        }
        Ok(Self {
            tag: tag.into(),
            samples,
        })
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    /// A series on the same timestamps carrying `values`
    ///
    /// The ordering invariant is inherited from `self`, so no re-validation is needed.
    pub(crate) fn with_values(&self, tag: impl Into<String>, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), self.samples.len());
        Self {
            tag: tag.into(),
            samples: self
                .samples
                .iter()
                .zip(values)
                .map(|(sample, value)| Sample {
                    timestamp: sample.timestamp,
                    value,
                })
                .collect(),
        }
    }
}

/// Seconds elapsed from `from` to `to`, with microsecond resolution
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn elapsed_seconds(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    let delta = to - from;
    delta.num_microseconds().map_or_else(
        || delta.num_milliseconds() as f64 * 1e-3,
        |us| us as f64 * 1e-6,
    )
}

/// Why a sample carries no lifetime
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GapReason {
    /// The first sample of a finite-difference estimate
    NoPredecessor,
    /// Consecutive particle counts have a zero, negative or non-finite ratio
    NonPositiveRatio,
    /// Consecutive particle counts are identical, so no decay is observable
    UnitRatio,
    /// No stored particles, or a non-finite count
    NonPositiveCount,
    /// The computed lifetime (hours) fell outside the plausible window
    Implausible(f64),
}

/// The lifetime attached to one sample of an empirical estimate
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lifetime {
    Hours(f64),
    Gap(GapReason),
}

impl Lifetime {
    #[must_use]
    pub const fn hours(self) -> Option<f64> {
        match self {
            Self::Hours(hours) => Some(hours),
            Self::Gap(_) => None,
        }
    }

    #[must_use]
    pub const fn is_gap(self) -> bool {
        matches!(self, Self::Gap(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifetimePoint {
    pub timestamp: NaiveDateTime,
    pub lifetime: Lifetime,
}

/// A lifetime per sample, tagged with the method which produced it
#[derive(Clone, Debug, PartialEq)]
pub struct LifetimeSeries {
    method: String,
    points: Vec<LifetimePoint>,
}

impl LifetimeSeries {
    pub(crate) fn from_lifetimes(
        method: impl Into<String>,
        source: &TimeSeries,
        lifetimes: impl IntoIterator<Item = Lifetime>,
    ) -> Self {
        let points = source
            .samples()
            .iter()
            .zip(lifetimes)
            .map(|(sample, lifetime)| LifetimePoint {
                timestamp: sample.timestamp,
                lifetime,
            })
            .collect::<Vec<_>>();
        debug_assert_eq!(points.len(), source.len());
        Self {
            method: method.into(),
            points,
        }
    }

    /// Lay a scalar prediction over the timestamps of `source`, for side-by-side reporting
    #[must_use]
    pub fn constant(method: impl Into<String>, source: &TimeSeries, hours: f64) -> Self {
        Self::from_lifetimes(
            method,
            source,
            std::iter::repeat(Lifetime::Hours(hours)),
        )
    }

    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    #[must_use]
    pub fn points(&self) -> &[LifetimePoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The lifetimes which are not gaps, in hours
    pub fn valid_hours(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().filter_map(|p| p.lifetime.hours())
    }

    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.points.iter().filter(|p| p.lifetime.is_gap()).count()
    }
}

/// The output of a lifetime method: a model prediction or an observed series
#[derive(Clone, Debug, PartialEq)]
pub enum LifetimeEstimate {
    Predicted { method: String, hours: f64 },
    Observed(LifetimeSeries),
}

impl LifetimeEstimate {
    #[must_use]
    pub fn method(&self) -> &str {
        match self {
            Self::Predicted { method, .. } => method,
            Self::Observed(series) => series.method(),
        }
    }

    /// The scalar lifetime of a prediction, `None` for an observed series
    #[must_use]
    pub const fn predicted_hours(&self) -> Option<f64> {
        match self {
            Self::Predicted { hours, .. } => Some(*hours),
            Self::Observed(_) => None,
        }
    }
}
