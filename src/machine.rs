use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::constants::{mm_mrad_to_m_rad, ELECTRON_REST_ENERGY_GEV};
use crate::error::require_positive;
use crate::{Error, Result};

/// How the transverse acceptance is turned into the largest tolerable scattering angle
///
/// Historical analyses of the same ring used two different mappings. The dimensionally
/// consistent one is the default; the other is kept so old numbers can be reproduced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceMapping {
    /// $\theta_{max} = \sqrt{\epsilon_A / \bar\beta}$
    #[default]
    SqrtRatio,
    /// $\theta_{max} = \epsilon_A^2 / \bar\beta$. Not dimensionally consistent
    SquaredRatio,
}

impl AcceptanceMapping {
    /// Maximum scattering angle in radians for an acceptance in m·rad and a betatron function in m
    #[must_use]
    pub fn angle(self, acceptance_m_rad: f64, betatron_function: f64) -> f64 {
        match self {
            Self::SqrtRatio => (acceptance_m_rad / betatron_function).sqrt(),
            Self::SquaredRatio => acceptance_m_rad.powi(2) / betatron_function,
        }
    }
}

/// Machine and beam parameters of a storage ring
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MachineParameters {
    /// Particle velocity in units of c
    pub beta: f64,
    /// Ring-averaged horizontal betatron function (m)
    pub average_betatron_x: f64,
    /// Ring-averaged vertical betatron function (m)
    pub average_betatron_y: f64,
    /// Transverse acceptance (mm·mrad)
    pub acceptance: f64,
    /// Residual-gas pressure (Torr)
    pub pressure_torr: f64,
    /// Total beam energy (GeV)
    pub energy_gev: f64,
    #[serde(default = "default_rest_mass")]
    pub rest_mass_gev: f64,
    /// Revolution frequency (Hz)
    pub revolution_frequency: f64,
    /// Charge number of the stored particle
    #[serde(default = "default_charge_number")]
    pub charge_number: f64,
    /// Nuclear charge of the residual gas. When unset the mixture's effective charges are used
    #[serde(default)]
    pub gas_charge: Option<f64>,
    /// Fractional momentum acceptance $\Delta p / p$ of the ring
    pub momentum_acceptance: f64,
    /// Residual-gas temperature (K)
    #[serde(default = "default_gas_temperature")]
    pub gas_temperature: f64,
    #[serde(default)]
    pub acceptance_mapping: AcceptanceMapping,
}

const fn default_rest_mass() -> f64 {
    ELECTRON_REST_ENERGY_GEV
}

const fn default_charge_number() -> f64 {
    1.
}

const fn default_gas_temperature() -> f64 {
    300.
}

impl MachineParameters {
    /// The Siberia-2 electron storage ring at 2.3 GeV with a 1e-7 Pa vacuum
    #[must_use]
    pub fn siberia2() -> Self {
        Self {
            beta: 1.,
            average_betatron_x: 10.,
            average_betatron_y: 5.,
            acceptance: 50.,
            pressure_torr: crate::constants::pascal_to_torr(1e-7),
            energy_gev: 2.3,
            rest_mass_gev: ELECTRON_REST_ENERGY_GEV,
            revolution_frequency: 2.4147e6,
            charge_number: 1.,
            gas_charge: None,
            momentum_acceptance: 0.02,
            gas_temperature: 300.,
            acceptance_mapping: AcceptanceMapping::SqrtRatio,
        }
    }

    /// Check every parameter lies in its physical range
    ///
    /// # Errors
    /// Returns [`Error::Domain`] naming the first parameter out of range.
    pub fn validate(&self) -> Result<()> {
        require_beta(self.beta)?;
        require_positive("average horizontal betatron function", self.average_betatron_x)?;
        require_positive("average vertical betatron function", self.average_betatron_y)?;
        require_positive("acceptance", self.acceptance)?;
        require_pressure(self.pressure_torr)?;
        require_positive("rest mass", self.rest_mass_gev)?;
        require_positive("energy", self.energy_gev)?;
        if self.energy_gev < self.rest_mass_gev {
            return Err(Error::domain(format!(
                "beam energy {} GeV is below the rest mass {} GeV",
                self.energy_gev, self.rest_mass_gev
            )));
        }
        require_positive("revolution frequency", self.revolution_frequency)?;
        if !self.charge_number.is_finite() || self.charge_number == 0. {
            return Err(Error::domain(format!(
                "particle charge number must be non-zero, got {}",
                self.charge_number
            )));
        }
        if let Some(z) = self.gas_charge {
            require_positive("gas nuclear charge", z)?;
        }
        require_momentum_acceptance(self.momentum_acceptance)?;
        require_positive("gas temperature", self.gas_temperature)?;
        Ok(())
    }

    /// Mean of the horizontal and vertical average betatron functions (m)
    #[must_use]
    pub fn average_betatron(&self) -> f64 {
        (self.average_betatron_x + self.average_betatron_y) / 2.
    }

    /// Acceptance in m·rad
    #[must_use]
    pub fn acceptance_m_rad(&self) -> f64 {
        mm_mrad_to_m_rad(self.acceptance)
    }

    /// Lorentz factor $\gamma = E / m c^2$
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.energy_gev / self.rest_mass_gev
    }

    /// Beam momentum $p = \beta \gamma m c = \beta E / c$ in GeV/c
    #[must_use]
    pub fn momentum_gev(&self) -> f64 {
        self.beta * self.energy_gev
    }

    /// Largest single-scattering angle which keeps a particle inside the acceptance
    ///
    /// # Errors
    /// Returns [`Error::Domain`] if the resulting angle is not in $(0, \pi)$.
    pub fn theta_max(&self) -> Result<f64> {
        let theta = self
            .acceptance_mapping
            .angle(self.acceptance_m_rad(), self.average_betatron());
        require_angle(theta)
    }

    /// Pressure over temperature, the density scale of the Chao formulas (Torr/K)
    #[must_use]
    pub fn pressure_scale(&self) -> f64 {
        self.pressure_torr / self.gas_temperature
    }
}

pub(crate) fn require_beta(beta: f64) -> Result<f64> {
    if beta.is_finite() && beta > 0. && beta <= 1. {
        Ok(beta)
    } else {
        Err(Error::domain(format!("beta must lie in (0, 1], got {beta}")))
    }
}

pub(crate) fn require_pressure(pressure: f64) -> Result<f64> {
    if pressure.is_finite() && pressure >= 0. {
        Ok(pressure)
    } else {
        Err(Error::domain(format!(
            "pressure must be non-negative, got {pressure}"
        )))
    }
}

pub(crate) fn require_angle(theta: f64) -> Result<f64> {
    if theta.is_finite() && theta > 0. && theta < PI {
        Ok(theta)
    } else {
        Err(Error::domain(format!(
            "maximum scattering angle must lie in (0, π), got {theta}"
        )))
    }
}

pub(crate) fn require_momentum_acceptance(limit: f64) -> Result<f64> {
    if limit.is_finite() && limit > 0. && limit < 1. {
        Ok(limit)
    } else {
        Err(Error::domain(format!(
            "fractional momentum acceptance must lie in (0, 1), got {limit}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{AcceptanceMapping, MachineParameters};
    use crate::{Error, Result};

    #[test]
    fn siberia_parameters_are_valid() -> Result<()> {
        let machine = MachineParameters::siberia2();
        machine.validate()?;
        approx::assert_relative_eq!(machine.average_betatron(), 7.5);
        approx::assert_relative_eq!(machine.gamma(), 2.3 / 0.000_511);
        Ok(())
    }

    #[test]
    fn sqrt_mapping_converts_acceptance_to_an_angle() -> Result<()> {
        let machine = MachineParameters::siberia2();
        let theta = machine.theta_max()?;
        approx::assert_relative_eq!(theta, (50e-6_f64 / 7.5).sqrt(), max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn squared_mapping_reproduces_legacy_angle() -> Result<()> {
        let machine = MachineParameters {
            acceptance_mapping: AcceptanceMapping::SquaredRatio,
            ..MachineParameters::siberia2()
        };
        let theta = machine.theta_max()?;
        approx::assert_relative_eq!(theta, 50e-6_f64.powi(2) / 7.5, max_relative = 1e-12);
        Ok(())
    }

    #[test]
    fn out_of_range_parameters_are_domain_errors() {
        let base = MachineParameters::siberia2();
        let cases = [
            MachineParameters { beta: 0., ..base.clone() },
            MachineParameters { beta: 1.01, ..base.clone() },
            MachineParameters { pressure_torr: -1e-9, ..base.clone() },
            MachineParameters { gas_charge: Some(0.), ..base.clone() },
            MachineParameters { momentum_acceptance: 1., ..base.clone() },
            MachineParameters { energy_gev: 1e-4, ..base.clone() },
            MachineParameters { charge_number: 0., ..base },
        ];
        for case in cases {
            assert!(matches!(case.validate(), Err(Error::Domain(_))));
        }
    }

    #[test]
    fn angle_outside_open_interval_is_rejected() {
        let machine = MachineParameters {
            acceptance: 1e9,
            average_betatron_x: 1e-3,
            average_betatron_y: 1e-3,
            ..MachineParameters::siberia2()
        };
        assert!(matches!(machine.theta_max(), Err(Error::Domain(_))));
    }
}
