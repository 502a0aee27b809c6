//! Variation sweep drivers: fixed alpha grid and gradient descent.
//!
//! Both modes feed the same cycle engine through the `ParameterSchedule`
//! contract; the schedule decides the next alpha from the previous run (or
//! stops the sweep), the driver records statistics rows and the per-cycle
//! energy log.

use nalgebra::DMatrix;

use super::traits::Propagator;
use super::vmc::{sample_alpha, AlphaRun, VmcParams};
use crate::wavefunction::TrialWfn;

/// Produces the sequence of variational parameters to evaluate.
pub trait ParameterSchedule {
    /// The next alpha, given the finished previous run, or `None` when the
    /// sweep is over.
    fn next_alpha(&mut self, previous: Option<&AlphaRun>) -> Option<f64>;
}

/// Precomputed arithmetic progression of alpha values.
pub struct FixedGridSweep {
    alphas: Vec<f64>,
    cursor: usize,
}

impl FixedGridSweep {
    pub fn new(alphas: Vec<f64>) -> Self {
        Self { alphas, cursor: 0 }
    }

    /// Inclusive linear spacing from `start` to `stop`.
    pub fn linspace(start: f64, stop: f64, count: usize) -> Self {
        let alphas = if count <= 1 {
            vec![start]
        } else {
            let step = (stop - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        };
        Self::new(alphas)
    }
}

impl ParameterSchedule for FixedGridSweep {
    fn next_alpha(&mut self, _previous: Option<&AlphaRun>) -> Option<f64> {
        let alpha = self.alphas.get(self.cursor).copied();
        self.cursor += 1;
        alpha
    }
}

/// Gradient descent on alpha using the sampled dE/dα estimate.
pub struct GradientDescent {
    initial_alpha: f64,
    learning_rate: f64,
    max_iterations: usize,
    /// Optional early stop on |dE/dα| < tolerance.
    tolerance: Option<f64>,
    issued: usize,
}

impl GradientDescent {
    pub fn new(
        initial_alpha: f64,
        learning_rate: f64,
        max_iterations: usize,
        tolerance: Option<f64>,
    ) -> Self {
        Self {
            initial_alpha,
            learning_rate,
            max_iterations,
            tolerance,
            issued: 0,
        }
    }
}

impl ParameterSchedule for GradientDescent {
    fn next_alpha(&mut self, previous: Option<&AlphaRun>) -> Option<f64> {
        if self.issued >= self.max_iterations {
            return None;
        }
        let alpha = match previous {
            None => self.initial_alpha,
            Some(run) => {
                if let Some(tol) = self.tolerance {
                    if run.energy_gradient.abs() < tol {
                        return None;
                    }
                }
                run.alpha - self.learning_rate * run.energy_gradient
            }
        };
        self.issued += 1;
        Some(alpha)
    }
}

/// One row of the statistics table, owned by the driver.
#[derive(Clone, Copy, Debug)]
pub struct StatisticsRow {
    pub alpha: f64,
    pub energy: f64,
    pub variance: f64,
    pub acceptance_rate: f64,
}

/// Everything a finished sweep hands to the reporter.
pub struct SweepResults {
    pub rows: Vec<StatisticsRow>,
    /// Per-cycle total energies, one column per variational parameter.
    pub energies: DMatrix<f64>,
}

/// Drive the schedule to completion, one cycle-engine run per parameter.
pub fn run_sweep<P: Propagator, S: ParameterSchedule>(
    trial: &dyn TrialWfn,
    propagator: &P,
    params: VmcParams,
    schedule: &mut S,
    verbose: bool,
) -> SweepResults {
    let mut rows = Vec::new();
    let mut columns: Vec<Vec<f64>> = Vec::new();
    let mut previous: Option<AlphaRun> = None;

    while let Some(alpha) = schedule.next_alpha(previous.as_ref()) {
        let mut run = sample_alpha(trial, propagator, params, alpha);
        if verbose {
            println!(
                "Iter {:3}: alpha = {:.6}, E = {:10.6}, sigma^2 = {:10.6}, acceptance = {:.3}",
                rows.len(),
                alpha,
                run.energy,
                run.variance,
                run.acceptance_rate
            );
        }
        rows.push(StatisticsRow {
            alpha: run.alpha,
            energy: run.energy,
            variance: run.variance,
            acceptance_rate: run.acceptance_rate,
        });
        columns.push(std::mem::take(&mut run.energies));
        previous = Some(run);
    }

    let energies = DMatrix::from_fn(params.n_cycles, columns.len(), |r, c| columns[c][r]);
    SweepResults { rows, energies }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::{BruteForce, ImportanceSampling};
    use crate::wavefunction::select_trial;
    use approx::assert_relative_eq;

    fn grid_params() -> VmcParams {
        VmcParams { n_particles: 2, n_cycles: 500, n_workers: 2, seed: 17 }
    }

    #[test]
    fn test_linspace_endpoints_and_count() {
        let mut grid = FixedGridSweep::linspace(0.1, 1.0, 10);
        let mut alphas = Vec::new();
        while let Some(a) = grid.next_alpha(None) {
            alphas.push(a);
        }
        assert_eq!(alphas.len(), 10);
        assert_relative_eq!(alphas[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(alphas[9], 1.0, epsilon = 1e-12);
        assert!(alphas.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_fixed_grid_sweep_shape_and_order() {
        let trial = select_trial(2, 1.0, false, 0.0).unwrap();
        let sampler = BruteForce { step_size: 1.0 };
        let mut schedule = FixedGridSweep::linspace(0.2, 0.8, 7);

        let results = run_sweep(trial.as_ref(), &sampler, grid_params(), &mut schedule, false);
        assert_eq!(results.rows.len(), 7);
        assert_eq!(results.energies.nrows(), 500);
        assert_eq!(results.energies.ncols(), 7);
        assert!(results.rows.windows(2).all(|w| w[0].alpha < w[1].alpha));
    }

    #[test]
    fn test_gradient_estimate_points_toward_the_optimum() {
        let trial = select_trial(1, 1.0, false, 0.0).unwrap();
        let sampler = BruteForce { step_size: 1.0 };
        let params = VmcParams { n_particles: 1, n_cycles: 40_000, n_workers: 1, seed: 21 };

        let below = sample_alpha(trial.as_ref(), &sampler, params, 0.3);
        let above = sample_alpha(trial.as_ref(), &sampler, params, 0.8);
        assert!(below.energy_gradient < 0.0, "gradient below optimum was {}", below.energy_gradient);
        assert!(above.energy_gradient > 0.0, "gradient above optimum was {}", above.energy_gradient);
    }

    #[test]
    fn test_gradient_descent_converges_to_half() {
        let trial = select_trial(1, 1.0, false, 0.0).unwrap();
        let sampler = ImportanceSampling { time_step: 0.1, diffusion: 0.5 };
        let params = VmcParams { n_particles: 1, n_cycles: 20_000, n_workers: 2, seed: 4 };
        let mut schedule = GradientDescent::new(0.4, 0.3, 30, None);

        let results = run_sweep(trial.as_ref(), &sampler, params, &mut schedule, false);
        assert_eq!(results.rows.len(), 30);
        let last = results.rows.last().unwrap();
        assert!((last.alpha - 0.5).abs() < 0.03, "final alpha was {}", last.alpha);
    }

    #[test]
    fn test_gradient_descent_tolerance_stops_early() {
        let trial = select_trial(1, 1.0, false, 0.0).unwrap();
        let sampler = BruteForce { step_size: 1.0 };
        let params = VmcParams { n_particles: 1, n_cycles: 1_000, n_workers: 1, seed: 9 };
        // Any finite gradient beats a huge tolerance, so one run suffices.
        let mut schedule = GradientDescent::new(0.4, 0.1, 50, Some(10.0));

        let results = run_sweep(trial.as_ref(), &sampler, params, &mut schedule, false);
        assert_eq!(results.rows.len(), 1);
    }
}
