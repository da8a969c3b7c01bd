//! Elastic (Coulomb) scattering on residual-gas nuclei
//!
//! A particle is lost when a single collision kicks it by more than the largest angle the ring
//! acceptance tolerates. Two parametrisations are provided: Wiedermann's, in terms of the
//! Rutherford cross-section integrated beyond $\theta_{max}$, and Chao's, in terms of the
//! acceptance and a representative betatron function.

use std::f64::consts::PI;

use crate::constants::{seconds_to_hours, PhysicalConstants, TORR_PER_ATMOSPHERE};
use crate::error::require_positive;
use crate::gas::MixtureSummary;
use crate::machine::{require_angle, require_beta, require_pressure, MachineParameters};
use crate::physics::LifetimeModel;
use crate::{Error, Result};

/// Inputs of the single Coulomb scattering rate
///
/// Shared by the Wiedermann prediction and the pointwise Zaycev estimator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SingleScattering {
    /// Particle velocity in units of c
    pub beta: f64,
    /// Residual-gas pressure (Torr)
    pub pressure_torr: f64,
    /// Charge number of the stored particle
    pub charge_number: f64,
    /// Nuclear charge of the gas
    pub gas_charge: f64,
    /// Beam momentum (GeV/c)
    pub momentum_gev: f64,
    /// Largest tolerable scattering angle (rad)
    pub theta_max: f64,
}

impl SingleScattering {
    /// Gather the inputs from the machine description
    ///
    /// The gas charge defaults to the mixture's mean charge unless the machine overrides it.
    ///
    /// # Errors
    /// Returns [`Error::Domain`] if the acceptance maps to an angle outside $(0, \pi)$.
    pub fn from_machine(machine: &MachineParameters, mixture: &MixtureSummary) -> Result<Self> {
        Ok(Self {
            beta: machine.beta,
            pressure_torr: machine.pressure_torr,
            charge_number: machine.charge_number,
            gas_charge: machine.gas_charge.unwrap_or(mixture.z_avg),
            momentum_gev: machine.momentum_gev(),
            theta_max: machine.theta_max()?,
        })
    }

    /// # Errors
    /// Returns [`Error::Domain`] for any input outside its physical range.
    pub fn validate(&self) -> Result<()> {
        require_beta(self.beta)?;
        require_pressure(self.pressure_torr)?;
        require_positive("gas nuclear charge", self.gas_charge)?;
        require_positive("momentum", self.momentum_gev)?;
        require_angle(self.theta_max)?;
        if !self.charge_number.is_finite() || self.charge_number == 0. {
            return Err(Error::domain(format!(
                "particle charge number must be non-zero, got {}",
                self.charge_number
            )));
        }
        Ok(())
    }

    /// Rutherford prefactor $\left(\frac{z Z e^2}{2 \beta c p}\right)^2$ in cm²
    #[must_use]
    pub fn cross_section_term(&self, constants: &PhysicalConstants) -> f64 {
        let momentum = constants.momentum_gev_to_cgs(self.momentum_gev);
        (self.charge_number * self.gas_charge * constants.elementary_charge_cgs.powi(2)
            / (2. * self.beta * constants.speed_of_light_cgs * momentum))
            .powi(2)
    }

    /// Angular part $2 / \tan^2(\theta_{max} / 2)$ of the Rutherford integral beyond $\theta_{max}$
    #[must_use]
    pub fn angular_integral(&self) -> f64 {
        2. / (self.theta_max / 2.).tan().powi(2)
    }

    /// Loss rate per particle (1/s) for a scatterer density `density` in 1/cm³
    ///
    /// $$
    ///     \frac{1}{N} \frac{dN}{dt} = -2 \pi c \beta n \left(\frac{z Z e^2}{2 \beta c p}\right)^2
    ///     \frac{2}{\tan^2(\theta_{max}/2)}
    /// $$
    #[must_use]
    pub fn loss_rate(&self, constants: &PhysicalConstants, density: f64) -> f64 {
        2. * PI
            * constants.speed_of_light_cgs
            * self.beta
            * density
            * self.cross_section_term(constants)
            * self.angular_integral()
    }
}

/// Wiedermann's single Coulomb scattering lifetime
///
/// The scatterer density is taken as $2 N_A P / 760$ with $P$ in Torr.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wiedermann(pub SingleScattering);

impl LifetimeModel for Wiedermann {
    fn method(&self) -> &'static str {
        "coulomb_wiedermann"
    }

    fn lifetime_hours(&self, constants: &PhysicalConstants) -> Result<f64> {
        let scattering = &self.0;
        scattering.validate()?;
        let density = 2. * constants.avogadro * scattering.pressure_torr / TORR_PER_ATMOSPHERE;
        let rate = scattering.loss_rate(constants, density);
        Ok(seconds_to_hours(1. / rate))
    }
}

/// Chao's elastic scattering lifetime
///
/// $$
///     \sigma_{el} = \frac{2 \pi r_e^2 Z^2 \bar\beta}{\gamma^2 \epsilon_A}, \qquad
///     \tau = \frac{1}{n_g \beta c \sigma_{el}}
/// $$
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaoCoulomb {
    pub beta: f64,
    /// Nuclear charge of the gas
    pub gas_charge: f64,
    /// Mean number of atoms per gas molecule
    pub nz_avg: f64,
    /// Representative betatron function (m)
    pub betatron_function: f64,
    /// Acceptance (m·rad)
    pub acceptance: f64,
    /// Lorentz factor
    pub gamma: f64,
    /// Pressure over temperature (Torr/K)
    pub pressure_scale: f64,
}

impl ChaoCoulomb {
    /// The gas charge defaults to the mixture's RMS charge unless the machine overrides it.
    #[must_use]
    pub fn from_machine(machine: &MachineParameters, mixture: &MixtureSummary) -> Self {
        Self {
            beta: machine.beta,
            gas_charge: machine.gas_charge.unwrap_or(mixture.z_eff),
            nz_avg: mixture.nz_avg,
            betatron_function: machine.average_betatron(),
            acceptance: machine.acceptance_m_rad(),
            gamma: machine.gamma(),
            pressure_scale: machine.pressure_scale(),
        }
    }

    /// Elastic cross-section (m²)
    #[must_use]
    pub fn cross_section(&self, constants: &PhysicalConstants) -> f64 {
        2. * PI
            * constants.classical_electron_radius.powi(2)
            * self.gas_charge.powi(2)
            * self.betatron_function
            / (self.gamma.powi(2) * self.acceptance)
    }
}

impl LifetimeModel for ChaoCoulomb {
    fn method(&self) -> &'static str {
        "coulomb_chao"
    }

    fn lifetime_hours(&self, constants: &PhysicalConstants) -> Result<f64> {
        require_beta(self.beta)?;
        require_positive("gas nuclear charge", self.gas_charge)?;
        require_positive("atoms per molecule", self.nz_avg)?;
        require_positive("betatron function", self.betatron_function)?;
        require_positive("acceptance", self.acceptance)?;
        require_pressure(self.pressure_scale)?;
        if !(self.gamma >= 1.) {
            return Err(Error::domain(format!(
                "Lorentz factor must be at least 1, got {}",
                self.gamma
            )));
        }

        let density = super::gas_density(constants, self.nz_avg, self.pressure_scale);
        let rate = density * self.beta * constants.speed_of_light * self.cross_section(constants);
        Ok(seconds_to_hours(1. / rate))
    }
}
