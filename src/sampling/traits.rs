//! Traits for Monte Carlo sampling.

use rand_chacha::ChaCha20Rng;

use super::walker::Walker;
use crate::wavefunction::TrialWfn;

/// A Metropolis move strategy: place the initial configuration, then advance
/// one particle at a time through {propose, evaluate, accept-or-reject}.
///
/// A step moves exactly one particle while all others stay fixed, recomputes
/// the total wave-function exponent over the whole configuration (the trial
/// function couples all particles through the shared exponent sum) and only
/// commits the move after the proposed state is fully evaluated.
pub trait Propagator: Send + Sync {
    /// Draw starting positions and build the walker.
    fn initialize(
        &self,
        trial: &dyn TrialWfn,
        n_particles: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> Walker;

    /// Attempt to move particle `k`. Returns `true` on acceptance.
    fn step(
        &self,
        trial: &dyn TrialWfn,
        walker: &mut Walker,
        k: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> bool;
}
