//! Physical constants and unit conversions
//!
//! The electromagnetic single-scattering formulas are evaluated in Gaussian CGS units, while the
//! Chao formulas work in SI. Both sets live side by side in [`PhysicalConstants`] so a model only
//! ever reads the system it was written in.

/// Speed of light (m/s)
pub const C: f64 = 299_792_458.0;

/// Elementary charge (C)
pub const E_CHARGE: f64 = 1.602_176_634e-19;

/// Avogadro number (1/mol)
pub const N_A: f64 = 6.022_140_76e23;

/// Classical electron radius (m)
pub const R_ELECTRON: f64 = 2.817_940_326_2e-15;

/// Fine-structure constant
pub const ALPHA: f64 = 7.297_352_569_3e-3;

/// Electron rest energy (GeV)
pub const ELECTRON_REST_ENERGY_GEV: f64 = 0.000_511;

/// Elementary charge in Gaussian units (statC)
pub const E_CHARGE_CGS: f64 = 4.803e-10;

/// Speed of light in Gaussian units (cm/s)
pub const C_CGS: f64 = 2.998e10;

/// Loschmidt number at 0 °C and 1 atm (1/cm³)
pub const LOSCHMIDT_CGS: f64 = 2.686_75e19;

/// Molecular number density per unit of `P[Torr] / T[K]` (1/m³)
pub const DENSITY_PER_TORR_KELVIN: f64 = 9.656e24;

/// One standard atmosphere in Torr
pub const TORR_PER_ATMOSPHERE: f64 = 760.0;

pub const SECONDS_PER_HOUR: f64 = 3600.0;

const TORR_PER_PASCAL: f64 = 7.500_62e-3;
const ERG_PER_GEV: f64 = 1.602_176_634e-3;

/// The complete set of constants consumed by the lifetime models
///
/// Constructed once (usually via [`Default`]) and passed by reference into every model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicalConstants {
    pub speed_of_light: f64,
    pub elementary_charge: f64,
    pub avogadro: f64,
    pub classical_electron_radius: f64,
    pub fine_structure: f64,
    pub speed_of_light_cgs: f64,
    pub elementary_charge_cgs: f64,
    pub loschmidt_cgs: f64,
    pub density_per_torr_kelvin: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            speed_of_light: C,
            elementary_charge: E_CHARGE,
            avogadro: N_A,
            classical_electron_radius: R_ELECTRON,
            fine_structure: ALPHA,
            speed_of_light_cgs: C_CGS,
            elementary_charge_cgs: E_CHARGE_CGS,
            loschmidt_cgs: LOSCHMIDT_CGS,
            density_per_torr_kelvin: DENSITY_PER_TORR_KELVIN,
        }
    }
}

impl PhysicalConstants {
    /// Convert a momentum in GeV/c to Gaussian units (g·cm/s)
    #[must_use]
    pub fn momentum_gev_to_cgs(&self, momentum_gev: f64) -> f64 {
        momentum_gev * ERG_PER_GEV / self.speed_of_light_cgs
    }

    /// Number of stored particles giving rise to `current` amperes at revolution frequency `f_rev`
    #[must_use]
    pub fn particle_count(&self, current: f64, revolution_frequency: f64) -> f64 {
        current / (self.elementary_charge * revolution_frequency)
    }
}

#[must_use]
pub fn pascal_to_torr(pascal: f64) -> f64 {
    pascal * TORR_PER_PASCAL
}

#[must_use]
pub fn seconds_to_hours(seconds: f64) -> f64 {
    seconds / SECONDS_PER_HOUR
}

/// Convert a transverse acceptance from mm·mrad to m·rad
#[must_use]
pub fn mm_mrad_to_m_rad(acceptance: f64) -> f64 {
    acceptance * 1e-6
}
