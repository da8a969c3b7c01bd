use crate::constants::{seconds_to_hours, PhysicalConstants, TORR_PER_ATMOSPHERE};
use crate::error::require_positive;
use crate::estimation::LifetimeEstimator;
use crate::physics::SingleScattering;
use crate::series::{GapReason, Lifetime, TimeSeries};
use crate::Result;

/// Pointwise lifetime from the single Coulomb scattering loss rate
///
/// The loss rate is evaluated at each sample from the stored particle count,
///
/// $$
///     \frac{dN}{dt} = -2 \pi c \beta n_{gas} N_t \left(\frac{z Z e^2}{2 \beta c p}\right)^2
///         \frac{2}{\tan^2(\theta_{max}/2)}, \qquad \tau = -\frac{N_t}{dN/dt}
/// $$
///
/// with a diatomic gas of density $n_{gas} = 2 L_0 P / 760$. No differencing is involved, so the
/// estimate is insensitive to sampling jitter but follows the fixed pressure and acceptance rather
/// than the observed current.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Zaycev {
    pub revolution_frequency: f64,
    pub scattering: SingleScattering,
    pub constants: PhysicalConstants,
}

impl Zaycev {
    #[must_use]
    pub fn new(revolution_frequency: f64, scattering: SingleScattering) -> Self {
        Self {
            revolution_frequency,
            scattering,
            constants: PhysicalConstants::default(),
        }
    }

    /// Scatterer density (1/cm³)
    #[must_use]
    pub fn gas_density(&self) -> f64 {
        2. * self.constants.loschmidt_cgs * self.scattering.pressure_torr / TORR_PER_ATMOSPHERE
    }
}

impl LifetimeEstimator for Zaycev {
    fn method(&self) -> &'static str {
        "coulomb_zaycev"
    }

    fn lifetimes(&self, current: &TimeSeries) -> Result<Vec<Lifetime>> {
        require_positive("revolution frequency", self.revolution_frequency)?;
        self.scattering.validate()?;

        let rate = self.scattering.loss_rate(&self.constants, self.gas_density());

        Ok(current
            .samples()
            .iter()
            .map(|sample| {
                let n = self
                    .constants
                    .particle_count(sample.value, self.revolution_frequency);
                if !(n.is_finite() && n > 0.) {
                    return Lifetime::Gap(GapReason::NonPositiveCount);
                }
                let derivative = -rate * n;
                let hours = seconds_to_hours(-n / derivative);
                if hours.is_finite() && hours > 0. {
                    Lifetime::Hours(hours)
                } else {
                    Lifetime::Gap(GapReason::Implausible(hours))
                }
            })
            .collect())
    }
}
