//! The Monte Carlo cycle engine for one variational parameter.
//!
//! Cycles are split across worker chunks; every worker owns a private
//! walker, accumulator and deterministically seeded random stream, and the
//! partial sums are merged in worker order at the join point so a run is
//! reproducible for a given seed and worker count.

use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

use super::rng::worker_rng;
use super::traits::Propagator;
use crate::wavefunction::TrialWfn;

/// Run parameters shared by every variational-parameter evaluation.
#[derive(Copy, Clone, Debug)]
pub struct VmcParams {
    pub n_particles: usize,
    pub n_cycles: usize,
    pub n_workers: usize,
    pub seed: u64,
}

/// Per-worker partial sums, combined by field-wise addition.
#[derive(Copy, Clone, Debug, Default)]
pub struct Accumulator {
    /// Σ over cycles of the cycle total local energy.
    pub energy: f64,
    /// Σ of squared cycle totals.
    pub energy_squared: f64,
    /// Σ of ∂ ln ψ / ∂α at the end-of-cycle configuration.
    pub log_deriv: f64,
    /// Σ of (cycle energy) · (∂ ln ψ / ∂α).
    pub energy_log_deriv: f64,
    /// Accepted single-particle moves (diagnostic only).
    pub accepted: u64,
}

impl Accumulator {
    /// Merge another worker's partial sums. Addition is associative and
    /// commutative, so the reduced totals do not depend on scheduling.
    pub fn merge(self, other: Self) -> Self {
        Self {
            energy: self.energy + other.energy,
            energy_squared: self.energy_squared + other.energy_squared,
            log_deriv: self.log_deriv + other.log_deriv,
            energy_log_deriv: self.energy_log_deriv + other.energy_log_deriv,
            accepted: self.accepted + other.accepted,
        }
    }
}

/// Finalized statistics for one variational parameter.
#[derive(Clone, Debug)]
pub struct AlphaRun {
    pub alpha: f64,
    /// ⟨E⟩, expectation of the total energy per cycle.
    pub energy: f64,
    /// σ² = ⟨E²⟩ - ⟨E⟩² of the total energy per cycle.
    pub variance: f64,
    /// Accepted moves / attempted moves.
    pub acceptance_rate: f64,
    /// Monte Carlo estimate of dE/dα from the covariance estimator.
    pub energy_gradient: f64,
    /// Total local energy at the end of each cycle, in cycle order.
    pub energies: Vec<f64>,
}

/// Evaluate one variational parameter over the full cycle budget.
pub fn sample_alpha<P: Propagator>(
    trial: &dyn TrialWfn,
    propagator: &P,
    params: VmcParams,
    alpha: f64,
) -> AlphaRun {
    let n_workers = params.n_workers.max(1).min(params.n_cycles.max(1));
    let base = params.n_cycles / n_workers;
    let remainder = params.n_cycles % n_workers;

    let mut ranges = Vec::with_capacity(n_workers);
    let mut start = 0;
    for w in 0..n_workers {
        let len = base + usize::from(w < remainder);
        ranges.push((start, len));
        start += len;
    }

    let partials: Vec<(usize, Accumulator, Vec<f64>)> = ranges
        .into_par_iter()
        .enumerate()
        .map(|(w, (row_offset, len))| {
            let mut rng = worker_rng(params.seed, w);
            let (acc, log) = run_chunk(trial, propagator, params.n_particles, len, alpha, &mut rng);
            (row_offset, acc, log)
        })
        .collect();

    let mut acc = Accumulator::default();
    let mut energies = vec![0.0; params.n_cycles];
    for (row_offset, partial, log) in partials {
        acc = acc.merge(partial);
        // Rows land at fixed indices regardless of thread interleaving.
        energies[row_offset..row_offset + log.len()].copy_from_slice(&log);
    }

    let n = params.n_cycles as f64;
    let energy = acc.energy / n;
    let second_moment = acc.energy_squared / n;
    let mean_log_deriv = acc.log_deriv / n;
    let mean_energy_log_deriv = acc.energy_log_deriv / n;

    AlphaRun {
        alpha,
        energy,
        variance: second_moment - energy * energy,
        acceptance_rate: acc.accepted as f64 / (n * params.n_particles as f64),
        energy_gradient: 2.0 * (mean_energy_log_deriv - energy * mean_log_deriv),
        energies,
    }
}

/// One worker's share of the cycle loop, on thread-private state.
fn run_chunk<P: Propagator>(
    trial: &dyn TrialWfn,
    propagator: &P,
    n_particles: usize,
    n_cycles: usize,
    alpha: f64,
    rng: &mut ChaCha20Rng,
) -> (Accumulator, Vec<f64>) {
    let mut walker = propagator.initialize(trial, n_particles, alpha, rng);
    let mut acc = Accumulator::default();
    let mut log = Vec::with_capacity(n_cycles);

    for _ in 0..n_cycles {
        let mut cycle_energy = 0.0;
        for k in 0..n_particles {
            if propagator.step(trial, &mut walker, k, alpha, rng) {
                acc.accepted += 1;
            }
            cycle_energy += trial.local_energy(&walker.positions, k, alpha);
        }
        let log_deriv = trial.log_derivative(&walker.positions, alpha);

        acc.energy += cycle_energy;
        acc.energy_squared += cycle_energy * cycle_energy;
        acc.log_deriv += log_deriv;
        acc.energy_log_deriv += cycle_energy * log_deriv;
        log.push(cycle_energy);
    }

    (acc, log)
}
