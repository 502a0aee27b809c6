//! Sampling module - Metropolis propagators, cycle engine and sweep drivers.

mod metropolis;
mod rng;
mod sweep;
mod traits;
mod vmc;
mod walker;

pub use metropolis::{BruteForce, ImportanceSampling};
pub use rng::worker_rng;
pub use sweep::{
    run_sweep, FixedGridSweep, GradientDescent, ParameterSchedule, StatisticsRow, SweepResults,
};
pub use traits::Propagator;
pub use vmc::{sample_alpha, Accumulator, AlphaRun, VmcParams};
pub use walker::Walker;
