//! Empirical lifetime estimates from (smoothed) beam-current telemetry
//!
//! Both estimators keep the pipeline total: a sample whose lifetime cannot be computed is marked
//! as a [`Lifetime::Gap`] and the scan carries on.

pub mod simple;
pub mod zaycev;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::series::{Lifetime, LifetimeSeries, TimeSeries};
use crate::Result;

pub use simple::SimpleDecay;
pub use zaycev::Zaycev;

/// Derives a lifetime per sample from a beam-current series (A)
pub trait LifetimeEstimator {
    /// Name used to tag the output series
    fn method(&self) -> &'static str;

    /// Lifetime of each sample of `current`
    ///
    /// # Errors
    /// Returns [`crate::Error::Domain`] if the estimator's physical parameters are out of range.
    /// Individual undefined samples are gaps, not errors.
    fn lifetimes(&self, current: &TimeSeries) -> Result<Vec<Lifetime>>;

    /// Estimate the lifetime series of `current`, same length and timestamps as the input
    ///
    /// # Errors
    /// See [`LifetimeEstimator::lifetimes`].
    fn estimate(&self, current: &TimeSeries) -> Result<LifetimeSeries> {
        let series =
            LifetimeSeries::from_lifetimes(self.method(), current, self.lifetimes(current)?);
        let gaps = series.gap_count();
        info!(
            "{}: {} of {} samples carry a lifetime",
            self.method(),
            series.len() - gaps,
            series.len()
        );
        if !series.is_empty() && gaps * 2 > series.len() {
            warn!(
                "{}: most samples of {} have no lifetime estimate",
                self.method(),
                current.tag()
            );
        }
        Ok(series)
    }
}

/// Settings shared by the empirical estimators
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct EstimationConfig {
    /// Estimator used when none is requested explicitly
    #[serde(default)]
    pub method: EstimatorMethod,
    /// Upper bound of the plausible lifetime window $(0, max]$ in hours
    #[serde(default = "default_max_plausible_hours")]
    pub max_plausible_hours: f64,
}

const fn default_max_plausible_hours() -> f64 {
    1000.
}

impl Default for EstimationConfig {
    fn default() -> Self {
        Self {
            method: EstimatorMethod::default(),
            max_plausible_hours: default_max_plausible_hours(),
        }
    }
}

/// The available empirical estimators
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatorMethod {
    #[default]
    Simple,
    Zaycev,
}
