//! IO module - run configuration and reporting for the VMC driver.

mod config;
pub mod report;

pub use config::{read_run_config, ConfigError, RunConfig, SamplingConfig, SweepConfig};
