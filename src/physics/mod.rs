//! Closed-form lifetime predictions for beam-gas loss mechanisms
//!
//! Every mechanism is a plain struct of the scalars its formula needs, implementing
//! [`LifetimeModel`]. [`PhysicsModel`] selects mechanisms by name and gathers their inputs from a
//! [`MachineParameters`] and a [`MixtureSummary`], so callers can iterate a configured list and
//! hand the predictions straight to [`crate::combine`].

pub mod bremsstrahlung;
pub mod coulomb;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::PhysicalConstants;
use crate::gas::MixtureSummary;
use crate::machine::MachineParameters;
use crate::series::LifetimeEstimate;
use crate::Result;

pub use bremsstrahlung::{radiation_length, ChaoBremsstrahlung};
pub use coulomb::{ChaoCoulomb, SingleScattering, Wiedermann};

/// A loss mechanism with a scalar lifetime prediction
pub trait LifetimeModel {
    /// Name used to tag the prediction
    fn method(&self) -> &'static str;

    /// Predicted lifetime in hours
    ///
    /// A vanishing gas density yields an infinite lifetime.
    ///
    /// # Errors
    /// Returns [`crate::Error::Domain`] if an input is outside the model's physical range.
    fn lifetime_hours(&self, constants: &PhysicalConstants) -> Result<f64>;
}

/// Molecular number density (1/m³) scaled by the atoms per molecule
pub(crate) fn gas_density(constants: &PhysicalConstants, nz_avg: f64, pressure_scale: f64) -> f64 {
    constants.density_per_torr_kelvin * nz_avg * pressure_scale
}

/// The available physics models
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsModel {
    Wiedermann,
    ChaoCoulomb,
    ChaoBremsstrahlung,
}

impl PhysicsModel {
    pub const ALL: [Self; 3] = [Self::Wiedermann, Self::ChaoCoulomb, Self::ChaoBremsstrahlung];

    /// Instantiate the model from machine and gas parameters
    ///
    /// # Errors
    /// Returns [`crate::Error::Domain`] if the machine parameters cannot feed the model.
    pub fn build(
        self,
        machine: &MachineParameters,
        mixture: &MixtureSummary,
    ) -> Result<Box<dyn LifetimeModel>> {
        Ok(match self {
            Self::Wiedermann => Box::new(Wiedermann(SingleScattering::from_machine(
                machine, mixture,
            )?)),
            Self::ChaoCoulomb => Box::new(ChaoCoulomb::from_machine(machine, mixture)),
            Self::ChaoBremsstrahlung => Box::new(ChaoBremsstrahlung::from_machine(machine, mixture)),
        })
    }
}

/// Evaluate each of `models`, tagging the predictions with the method names
///
/// # Errors
/// Returns the first domain error raised by a model.
pub fn predict(
    models: &[PhysicsModel],
    machine: &MachineParameters,
    mixture: &MixtureSummary,
    constants: &PhysicalConstants,
) -> Result<Vec<LifetimeEstimate>> {
    models
        .iter()
        .map(|model| {
            let model = model.build(machine, mixture)?;
            let hours = model.lifetime_hours(constants)?;
            debug!("{} predicts {hours:.4} h", model.method());
            Ok(LifetimeEstimate::Predicted {
                method: model.method().to_owned(),
                hours,
            })
        })
        .collect()
}
