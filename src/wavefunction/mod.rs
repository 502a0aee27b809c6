//! Wavefunction module - trial functions for the trapped boson gas.

mod gaussian;
mod traits;

pub use gaussian::{select_trial, Gaussian1, Gaussian2, Gaussian3, HardSphere3, SetupError};
pub use traits::TrialWfn;
