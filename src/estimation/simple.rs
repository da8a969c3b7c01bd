use itertools::Itertools;

use crate::constants::{seconds_to_hours, PhysicalConstants};
use crate::error::require_positive;
use crate::estimation::{EstimationConfig, LifetimeEstimator};
use crate::series::{elapsed_seconds, GapReason, Lifetime, TimeSeries};
use crate::Result;

/// Lifetime from the exponential decay between consecutive samples
///
/// With $N_t = I_t / (e f_{rev})$ stored particles, the decay $N_t = N_{t-1} e^{-\Delta t / \tau}$
/// gives
///
/// $$
///     \tau = -\frac{\Delta t}{\ln(N_t / N_{t-1})}
/// $$
///
/// Lifetimes outside $(0, max]$ hours come from samples too close together in value for the
/// logarithm to resolve, and are dropped as implausible.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimpleDecay {
    pub revolution_frequency: f64,
    pub config: EstimationConfig,
    pub constants: PhysicalConstants,
}

impl SimpleDecay {
    #[must_use]
    pub fn new(revolution_frequency: f64, config: EstimationConfig) -> Self {
        Self {
            revolution_frequency,
            config,
            constants: PhysicalConstants::default(),
        }
    }

    #[allow(clippy::float_cmp)]
    fn pair_lifetime(&self, n_previous: f64, n_current: f64, dt: f64) -> Lifetime {
        let ratio = n_current / n_previous;
        if !(ratio.is_finite() && ratio > 0.) {
            return Lifetime::Gap(GapReason::NonPositiveRatio);
        }
        if ratio == 1. {
            return Lifetime::Gap(GapReason::UnitRatio);
        }

        let hours = seconds_to_hours(-dt / ratio.ln());
        if hours > 0. && hours <= self.config.max_plausible_hours {
            Lifetime::Hours(hours)
        } else {
            Lifetime::Gap(GapReason::Implausible(hours))
        }
    }
}

impl LifetimeEstimator for SimpleDecay {
    fn method(&self) -> &'static str {
        "simple"
    }

    fn lifetimes(&self, current: &TimeSeries) -> Result<Vec<Lifetime>> {
        require_positive("revolution frequency", self.revolution_frequency)?;
        require_positive("maximum plausible lifetime", self.config.max_plausible_hours)?;

        let counts = current
            .samples()
            .iter()
            .map(|s| {
                (
                    s.timestamp,
                    self.constants.particle_count(s.value, self.revolution_frequency),
                )
            })
            .collect::<Vec<_>>();

        let mut lifetimes = Vec::with_capacity(counts.len());
        if !counts.is_empty() {
            lifetimes.push(Lifetime::Gap(GapReason::NoPredecessor));
        }
        lifetimes.extend(counts.iter().tuple_windows().map(
            |(&(t_previous, n_previous), &(t_current, n_current))| {
                self.pair_lifetime(n_previous, n_current, elapsed_seconds(t_previous, t_current))
            },
        ));
        Ok(lifetimes)
    }
}
