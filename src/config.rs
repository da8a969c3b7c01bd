use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::estimation::EstimationConfig;
use crate::gas::{GasComponent, GasMixture, MixtureSummary};
use crate::machine::MachineParameters;
use crate::physics::PhysicsModel;
use crate::smoothing::SignalConditioner;
use crate::Result;

/// On-disk layout of a configuration file
#[derive(Deserialize)]
struct ConfigFile {
    machine: MachineParameters,
    #[serde(default)]
    smoothing: SignalConditioner,
    #[serde(default)]
    estimation: EstimationConfig,
    #[serde(default = "all_models")]
    models: Vec<PhysicsModel>,
    gas: Vec<GasComponent>,
}

fn all_models() -> Vec<PhysicsModel> {
    PhysicsModel::ALL.to_vec()
}

/// A validated description of the ring, its residual gas and the processing settings
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub machine: MachineParameters,
    pub mixture: GasMixture,
    pub smoothing: SignalConditioner,
    pub estimation: EstimationConfig,
    pub models: Vec<PhysicsModel>,
}

impl Config {
    /// Read and validate a TOML configuration file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, the gas mixture is invalid, or a
    /// machine parameter is out of its physical range.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml(&contents)?;
        info!(
            "loaded configuration from {} ({} gas species)",
            path.display(),
            config.mixture.components().len()
        );
        Ok(config)
    }

    /// Parse and validate a TOML configuration
    ///
    /// # Errors
    /// See [`Config::from_file`].
    pub fn from_toml(contents: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(contents)?;
        let mixture = GasMixture::new(file.gas)?;
        file.machine.validate()?;
        // Surfaces zero windows before any data is read
        file.smoothing.window_for(&[])?;

        Ok(Self {
            machine: file.machine,
            mixture,
            smoothing: file.smoothing,
            estimation: file.estimation,
            models: file.models,
        })
    }

    #[must_use]
    pub fn mixture_summary(&self) -> MixtureSummary {
        self.mixture.summarise()
    }
}
