//! # beam-lifetime
//!
//! Command-line front end to the lifetime engine.
//!
//! ```bash
//! # Observed lifetime from a current export
//! beam-lifetime estimate beam_data_2025-07-02.csv --config config/siberia2.toml -o lifetime.csv
//!
//! # Model predictions and their combination
//! beam-lifetime predict --config config/siberia2.toml
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use beam_lifetime::combine::combine_estimates;
use beam_lifetime::config::Config;
use beam_lifetime::constants::PhysicalConstants;
use beam_lifetime::estimation::{EstimatorMethod, LifetimeEstimator, SimpleDecay, Zaycev};
use beam_lifetime::ingest;
use beam_lifetime::math::median;
use beam_lifetime::physics::{predict, PhysicsModel, SingleScattering};
use beam_lifetime::series::{LifetimeEstimate, LifetimeSeries};
use beam_lifetime::smoothing::SignalConditioner;

/// Stored-beam lifetime from current telemetry and residual-gas models
#[derive(Parser)]
#[command(name = "beam-lifetime")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MethodArg {
    /// Exponential decay between consecutive samples
    Simple,
    /// Pointwise single Coulomb scattering rate
    Zaycev,
}

impl From<MethodArg> for EstimatorMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Simple => Self::Simple,
            MethodArg::Zaycev => Self::Zaycev,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ModelArg {
    Wiedermann,
    ChaoCoulomb,
    ChaoBremsstrahlung,
}

impl From<ModelArg> for PhysicsModel {
    fn from(arg: ModelArg) -> Self {
        match arg {
            ModelArg::Wiedermann => Self::Wiedermann,
            ModelArg::ChaoCoulomb => Self::ChaoCoulomb,
            ModelArg::ChaoBremsstrahlung => Self::ChaoBremsstrahlung,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the observed lifetime from a beam-current export
    Estimate {
        /// `tag;timestamp;value` current export (A)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Machine and gas configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Estimator, defaulting to the configured one
        #[arg(short, long, value_enum)]
        method: Option<MethodArg>,

        /// Smoothing window in samples, overriding the configured policy
        #[arg(short, long)]
        window: Option<usize>,

        /// Write the lifetime series to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the combined model prediction over the same timestamps
        #[arg(long, requires = "output")]
        with_prediction: bool,

        /// Write the smoothed current to this CSV file
        #[arg(long)]
        smoothed: Option<PathBuf>,
    },

    /// Predict the lifetime from the residual-gas models
    Predict {
        /// Machine and gas configuration
        #[arg(short, long)]
        config: PathBuf,

        /// Models to evaluate, defaulting to those in the configuration
        #[arg(long, value_enum, value_delimiter = ',')]
        models: Vec<ModelArg>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Estimate {
            input,
            config,
            method,
            window,
            output,
            with_prediction,
            smoothed,
        } => run_estimate(
            &input,
            &config,
            EstimateOptions {
                method: method.map(Into::into),
                window,
                output: output.map(|path| (path, with_prediction)),
                smoothed,
            },
        ),
        Commands::Predict { config, models } => {
            run_predict(&config, models.into_iter().map(Into::into).collect())
        }
    }
}

fn load_config(path: &Path) -> Result<Config> {
    Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))
}

struct EstimateOptions {
    method: Option<EstimatorMethod>,
    window: Option<usize>,
    /// Lifetime output path and whether to add the combined prediction
    output: Option<(PathBuf, bool)>,
    smoothed: Option<PathBuf>,
}

fn run_estimate(input: &Path, config: &Path, options: EstimateOptions) -> Result<()> {
    let EstimateOptions {
        method,
        window,
        output,
        smoothed: smoothed_output,
    } = options;
    let config = load_config(config)?;
    let current = ingest::read_series(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Read {} samples of {}", current.len(), current.tag());

    let conditioner = window.map_or(config.smoothing, |window| SignalConditioner {
        window: Some(window),
        ..config.smoothing
    });
    let smoothed = conditioner.condition(&current)?;
    if let Some(path) = smoothed_output {
        ingest::write_series(&path, &smoothed)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Smoothed current written to {}", path.display());
    }

    let frequency = config.machine.revolution_frequency;
    let method = method.unwrap_or(config.estimation.method);
    let estimator: Box<dyn LifetimeEstimator> = match method {
        EstimatorMethod::Simple => Box::new(SimpleDecay::new(frequency, config.estimation)),
        EstimatorMethod::Zaycev => {
            let scattering =
                SingleScattering::from_machine(&config.machine, &config.mixture_summary())?;
            Box::new(Zaycev::new(frequency, scattering))
        }
    };
    let lifetimes = estimator
        .estimate(&smoothed)
        .context("Lifetime estimation failed")?;

    let hours = lifetimes.valid_hours().collect::<Vec<_>>();
    println!(
        "{}: {} samples, {} gaps, median lifetime {}",
        lifetimes.method(),
        lifetimes.len(),
        lifetimes.gap_count(),
        median(&hours).map_or_else(|| "n/a".to_owned(), |h| format!("{h:.3} h"))
    );

    if let Some((output, with_prediction)) = output {
        let mut series = vec![lifetimes];
        if with_prediction {
            let total = combine_estimates(&predict_all(&config, &config.models)?)?;
            if let Some(hours) = total.predicted_hours() {
                series.push(LifetimeSeries::constant(total.method(), &smoothed, hours));
            }
        }
        ingest::write_lifetimes(&output, &series)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        info!("{} lifetime series written to {}", series.len(), output.display());
    }
    Ok(())
}

fn predict_all(config: &Config, models: &[PhysicsModel]) -> Result<Vec<LifetimeEstimate>> {
    predict(
        models,
        &config.machine,
        &config.mixture_summary(),
        &PhysicalConstants::default(),
    )
    .context("Model evaluation failed")
}

fn run_predict(config: &Path, models: Vec<PhysicsModel>) -> Result<()> {
    let config = load_config(config)?;
    let models = if models.is_empty() {
        config.models.clone()
    } else {
        models
    };

    let predictions = predict_all(&config, &models)?;
    for prediction in &predictions {
        if let LifetimeEstimate::Predicted { method, hours } = prediction {
            println!("{method}: {hours:.4} h");
        }
    }
    if let LifetimeEstimate::Predicted { method, hours } = combine_estimates(&predictions)? {
        println!("total ({method}): {hours:.4} h");
    }
    Ok(())
}
