use crate::constants::{seconds_to_hours, PhysicalConstants};
use crate::error::require_positive;
use crate::gas::MixtureSummary;
use crate::machine::{require_beta, require_momentum_acceptance, require_pressure, MachineParameters};
use crate::physics::LifetimeModel;
use crate::{Error, Result};

/// Radiation length of a medium with charge `z` and molar mass `a` (g/mol), in g/m²
///
/// Tsai's formula with the Coulomb correction
///
/// $$
///     f(Z) = a^2 \left[ (1 + a^2)^{-1} + 0.20206 - 0.0369 a^2 + 0.0083 a^4 - 0.002 a^6 \right],
///     \qquad a = \alpha Z
/// $$
///
/// # Errors
/// Returns [`Error::Domain`] if `z` or `a` is not positive.
pub fn radiation_length(constants: &PhysicalConstants, z: f64, a: f64) -> Result<f64> {
    require_positive("effective nuclear charge", z)?;
    require_positive("molar mass", a)?;

    let alpha = constants.fine_structure;
    let l_rad = (184.15 * z.powf(-1. / 3.)).ln();
    let l_rad_prime = (1194. * z.powf(-2. / 3.)).ln();

    let az2 = (alpha * z).powi(2);
    let coulomb_correction =
        az2 * (1. / (1. + az2) + 0.20206 - 0.0369 * az2 + 0.0083 * az2.powi(2) - 0.002 * az2.powi(3));

    let inverse = 4.
        * alpha
        * constants.classical_electron_radius.powi(2)
        * (constants.avogadro / a)
        * (z.powi(2) * (l_rad - coulomb_correction) + z * l_rad_prime);
    Ok(1. / inverse)
}

/// Chao's bremsstrahlung lifetime
///
/// A particle is lost when it radiates more than the momentum acceptance in a single photon
///
/// $$
///     \sigma_{br} = \frac{4}{3} \frac{A}{N_A X_0}
///         \left[\ln\left(\frac{1}{\Delta p / p}\right) - \frac{5}{8}\right]
/// $$
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaoBremsstrahlung {
    pub beta: f64,
    /// RMS nuclear charge of the gas
    pub z_eff: f64,
    /// Mean molar mass of the gas (g/mol)
    pub a_avg: f64,
    /// Mean number of atoms per gas molecule
    pub nz_avg: f64,
    /// Fractional momentum acceptance
    pub momentum_acceptance: f64,
    /// Pressure over temperature (Torr/K)
    pub pressure_scale: f64,
}

impl ChaoBremsstrahlung {
    #[must_use]
    pub fn from_machine(machine: &MachineParameters, mixture: &MixtureSummary) -> Self {
        Self {
            beta: machine.beta,
            z_eff: mixture.z_eff,
            a_avg: mixture.a_avg,
            nz_avg: mixture.nz_avg,
            momentum_acceptance: machine.momentum_acceptance,
            pressure_scale: machine.pressure_scale(),
        }
    }

    /// Bremsstrahlung cross-section for losses beyond the momentum acceptance (m²)
    ///
    /// # Errors
    /// Returns [`Error::Domain`] if the gas or acceptance parameters are out of range, or the
    /// acceptance is so wide that the cross-section is not positive.
    pub fn cross_section(&self, constants: &PhysicalConstants) -> Result<f64> {
        let limit = require_momentum_acceptance(self.momentum_acceptance)?;
        let x0 = radiation_length(constants, self.z_eff, self.a_avg)?;

        let log_term = (1. / limit).ln() - 5. / 8.;
        if log_term <= 0. {
            return Err(Error::domain(format!(
                "momentum acceptance {limit} is too wide for the bremsstrahlung approximation"
            )));
        }
        Ok(4. / 3. * (self.a_avg / constants.avogadro) / x0 * log_term)
    }
}

impl LifetimeModel for ChaoBremsstrahlung {
    fn method(&self) -> &'static str {
        "bremsstrahlung_chao"
    }

    fn lifetime_hours(&self, constants: &PhysicalConstants) -> Result<f64> {
        require_beta(self.beta)?;
        require_positive("atoms per molecule", self.nz_avg)?;
        require_pressure(self.pressure_scale)?;
        let sigma = self.cross_section(constants)?;

        let density = super::gas_density(constants, self.nz_avg, self.pressure_scale);
        let rate = density * self.beta * constants.speed_of_light * sigma;
        Ok(seconds_to_hours(1. / rate))
    }
}

#[cfg(test)]
mod tests {
    use super::{radiation_length, ChaoBremsstrahlung};
    use crate::constants::PhysicalConstants;
    use crate::physics::LifetimeModel;
    use crate::{Error, Result};

    fn siberia_bremsstrahlung() -> ChaoBremsstrahlung {
        ChaoBremsstrahlung {
            beta: 1.,
            z_eff: 3.407,
            a_avg: 8.8147,
            nz_avg: 2.1,
            momentum_acceptance: 0.02,
            pressure_scale: 7.5e-10 / 300.,
        }
    }

    #[test]
    fn nitrogen_radiation_length_matches_tabulated_value() -> Result<()> {
        // 37.99 g/cm² for atomic nitrogen
        let x0 = radiation_length(&PhysicalConstants::default(), 7., 14.007)?;
        approx::assert_relative_eq!(x0, 37.99e4, max_relative = 1e-3);
        Ok(())
    }

    #[test]
    fn lead_radiation_length_includes_the_coulomb_correction() -> Result<()> {
        // 6.37 g/cm², where f(Z) shifts X0 by several percent
        let x0 = radiation_length(&PhysicalConstants::default(), 82., 207.2)?;
        approx::assert_relative_eq!(x0, 6.37e4, max_relative = 1e-2);
        Ok(())
    }

    #[test]
    fn bremsstrahlung_matches_closed_form() -> Result<()> {
        let constants = PhysicalConstants::default();
        let model = siberia_bremsstrahlung();
        let x0 = radiation_length(&constants, model.z_eff, model.a_avg)?;
        let sigma = 4. / 3. * model.a_avg / (constants.avogadro * x0) * (50_f64.ln() - 0.625);
        let density = 9.656e24 * 2.1 * 7.5e-10 / 300.;
        let expected = 1. / (density * constants.speed_of_light * sigma) / 3600.;

        let tau = model.lifetime_hours(&constants)?;
        approx::assert_relative_eq!(tau, expected, max_relative = 1e-12);
        approx::assert_relative_eq!(tau, 233.227, max_relative = 1e-4);
        Ok(())
    }

    #[test]
    fn bremsstrahlung_lifetime_is_positive_and_finite() -> Result<()> {
        let tau = siberia_bremsstrahlung().lifetime_hours(&PhysicalConstants::default())?;
        assert!(tau.is_finite());
        assert!(tau > 0.);
        Ok(())
    }

    #[test]
    fn wider_momentum_acceptance_extends_lifetime() -> Result<()> {
        let constants = PhysicalConstants::default();
        let narrow = siberia_bremsstrahlung().lifetime_hours(&constants)?;
        let wide = ChaoBremsstrahlung {
            momentum_acceptance: 0.05,
            ..siberia_bremsstrahlung()
        }
        .lifetime_hours(&constants)?;
        assert!(wide > narrow);
        Ok(())
    }

    #[test]
    fn momentum_acceptance_outside_unit_interval_is_rejected() {
        let constants = PhysicalConstants::default();
        for momentum_acceptance in [1., 1.5, 0., -0.1, 0.6] {
            let model = ChaoBremsstrahlung {
                momentum_acceptance,
                ..siberia_bremsstrahlung()
            };
            assert!(matches!(
                model.lifetime_hours(&constants),
                Err(Error::Domain(_))
            ));
        }
    }
}
