use log::debug;
use serde::{Deserialize, Serialize};

use crate::math::{centered_moving_average, mean_and_std};
use crate::series::TimeSeries;
use crate::{Error, Result};

const LOW_NOISE_WINDOW: usize = 5;
const MIN_SCALED_WINDOW: usize = 7;
const SAMPLES_PER_WINDOW_STEP: usize = 1000;

/// Smooths telemetry with a centered moving average over an adaptively chosen window
///
/// A quiet series (standard deviation below a tenth of its mean) gets a short window, a noisy one
/// a window growing with the series length. Both are capped at `max_window`. Setting `window`
/// bypasses the policy altogether.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SignalConditioner {
    #[serde(default = "default_max_window")]
    pub max_window: usize,
    #[serde(default)]
    pub window: Option<usize>,
}

const fn default_max_window() -> usize {
    31
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self {
            max_window: default_max_window(),
            window: None,
        }
    }
}

impl SignalConditioner {
    #[must_use]
    pub const fn with_window(window: usize) -> Self {
        Self {
            max_window: default_max_window(),
            window: Some(window),
        }
    }

    /// The window that will be used to smooth `values`
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the explicit or maximum window is zero.
    pub fn window_for(&self, values: &[f64]) -> Result<usize> {
        if let Some(window) = self.window {
            if window == 0 {
                return Err(Error::configuration("smoothing window must be at least 1"));
            }
            return Ok(window);
        }
        if self.max_window == 0 {
            return Err(Error::configuration(
                "maximum smoothing window must be at least 1",
            ));
        }

        let quiet = mean_and_std(values).is_some_and(|(mean, std)| std < 0.1 * mean);
        let window = if quiet {
            LOW_NOISE_WINDOW
        } else {
            MIN_SCALED_WINDOW.max(values.len() / SAMPLES_PER_WINDOW_STEP)
        };
        Ok(window.min(self.max_window))
    }

    /// Smooth `series`, returning one output sample per input sample on the same timestamps
    ///
    /// # Errors
    /// Returns [`Error::Configuration`] if the window is zero.
    pub fn condition(&self, series: &TimeSeries) -> Result<TimeSeries> {
        let values = series.values();
        let window = self.window_for(&values)?;
        debug!(
            "smoothing {} ({} samples) with a {window}-sample window",
            series.tag(),
            series.len()
        );
        let smoothed = if values.is_empty() {
            values
        } else {
            centered_moving_average(&values, window)
        };
        Ok(series.with_values(series.tag(), smoothed))
    }

    /// Smooth several independent series
    ///
    /// # Errors
    /// Returns the first configuration error encountered.
    pub fn condition_all(&self, series: &[TimeSeries]) -> Result<Vec<TimeSeries>> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            series.par_iter().map(|s| self.condition(s)).collect()
        }
        #[cfg(not(feature = "parallel"))]
        {
            series.iter().map(|s| self.condition(s)).collect()
        }
    }
}
