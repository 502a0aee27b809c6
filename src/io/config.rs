//! Run configuration: YAML deserialization and fail-fast validation.
//!
//! Every configuration mistake the sampler cannot survive (unsupported
//! dimensionality, non-positive alpha or time step, ...) is rejected here,
//! before any cycles run.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Sampling strategy selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum SamplingConfig {
    BruteForce { step_size: f64 },
    Importance { time_step: f64, diffusion: f64 },
}

/// Variation sweep mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SweepConfig {
    FixedGrid {
        start: f64,
        stop: f64,
        count: usize,
    },
    GradientDescent {
        initial_alpha: f64,
        learning_rate: f64,
        iterations: usize,
        #[serde(default)]
        tolerance: Option<f64>,
    },
}

/// Full run configuration, read once and treated as immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub dimensions: usize,
    pub particles: usize,
    pub cycles: usize,
    #[serde(default = "default_workers")]
    pub workers: usize,
    pub seed: u64,
    #[serde(default = "default_beta")]
    pub beta: f64,
    #[serde(default)]
    pub interaction: bool,
    #[serde(default)]
    pub hard_sphere_radius: f64,
    pub sampling: SamplingConfig,
    pub sweep: SweepConfig,
    #[serde(default = "default_statistics_path")]
    pub statistics_path: String,
    #[serde(default)]
    pub statistics_per_particle_path: Option<String>,
    #[serde(default = "default_energies_path")]
    pub energies_path: String,
    #[serde(default)]
    pub verbose: bool,
}

fn default_workers() -> usize {
    1
}

fn default_beta() -> f64 {
    1.0
}

fn default_statistics_path() -> String {
    "generated_data/statistics.txt".to_string()
}

fn default_energies_path() -> String {
    "generated_data/energies.txt".to_string()
}

/// Errors from loading or validating a run configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read configuration: {e}"),
            ConfigError::Parse(e) => write!(f, "cannot parse configuration: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Read and validate a YAML run configuration.
pub fn read_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: RunConfig = serde_yaml::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

impl RunConfig {
    /// Reject every configuration the sampling core cannot survive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        if !(1..=3).contains(&self.dimensions) {
            return invalid(format!(
                "unsupported dimensionality: {} (must be 1, 2 or 3)",
                self.dimensions
            ));
        }
        if self.particles == 0 {
            return invalid("particle count must be at least 1".to_string());
        }
        if self.cycles == 0 {
            return invalid("cycle count must be at least 1".to_string());
        }
        if self.workers == 0 {
            return invalid("worker count must be at least 1".to_string());
        }
        if self.beta <= 0.0 {
            return invalid(format!("beta must be positive, got {}", self.beta));
        }
        if self.interaction && self.dimensions != 3 {
            return invalid(format!(
                "interaction requires 3 dimensions, got {}",
                self.dimensions
            ));
        }
        if self.hard_sphere_radius < 0.0 {
            return invalid(format!(
                "hard-sphere radius must be non-negative, got {}",
                self.hard_sphere_radius
            ));
        }

        match self.sampling {
            SamplingConfig::BruteForce { step_size } => {
                if step_size <= 0.0 {
                    return invalid(format!("step size must be positive, got {step_size}"));
                }
            }
            SamplingConfig::Importance { time_step, diffusion } => {
                if time_step <= 0.0 {
                    return invalid(format!("time step must be positive, got {time_step}"));
                }
                if diffusion <= 0.0 {
                    return invalid(format!(
                        "diffusion coefficient must be positive, got {diffusion}"
                    ));
                }
            }
        }

        match self.sweep {
            SweepConfig::FixedGrid { start, stop, count } => {
                if count == 0 {
                    return invalid("variational parameter count must be at least 1".to_string());
                }
                if start <= 0.0 {
                    return invalid(format!(
                        "alpha grid must be strictly positive, starts at {start}"
                    ));
                }
                if stop < start {
                    return invalid(format!("alpha grid end {stop} lies below start {start}"));
                }
            }
            SweepConfig::GradientDescent {
                initial_alpha,
                learning_rate,
                iterations,
                tolerance,
            } => {
                if initial_alpha <= 0.0 {
                    return invalid(format!(
                        "initial alpha must be positive, got {initial_alpha}"
                    ));
                }
                if learning_rate <= 0.0 {
                    return invalid(format!(
                        "learning rate must be positive, got {learning_rate}"
                    ));
                }
                if iterations == 0 {
                    return invalid("iteration budget must be at least 1".to_string());
                }
                if let Some(tol) = tolerance {
                    if tol <= 0.0 {
                        return invalid(format!("tolerance must be positive, got {tol}"));
                    }
                }
            }
        }

        Ok(())
    }
}
