//! Brute-force and importance-sampled Metropolis propagators.
//!
//! Both strategies share the `Propagator` contract; the acceptance rule is
//! the only thing that differs. Brute force compares bare wave-function
//! exponents, importance sampling folds in the drift-diffusion Green's
//! function ratio.

use nalgebra::DVector;
use rand::Rng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};

use super::traits::Propagator;
use super::walker::Walker;
use crate::wavefunction::TrialWfn;

/// Redraw budget when the initial configuration lands inside a hard core.
const MAX_INIT_ATTEMPTS: usize = 100;

/// Uniform-displacement Metropolis sampling.
pub struct BruteForce {
    pub step_size: f64,
}

impl Propagator for BruteForce {
    fn initialize(
        &self,
        trial: &dyn TrialWfn,
        n_particles: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> Walker {
        let mut attempts = 0;
        loop {
            let positions: Vec<DVector<f64>> = (0..n_particles)
                .map(|_| {
                    DVector::from_fn(trial.dims(), |_, _| {
                        (rng.gen::<f64>() - 0.5) * self.step_size
                    })
                })
                .collect();
            let walker = Walker::new(positions, trial, alpha, false);
            attempts += 1;
            if walker.log_psi.is_finite() || attempts >= MAX_INIT_ATTEMPTS {
                return walker;
            }
        }
    }

    fn step(
        &self,
        trial: &dyn TrialWfn,
        walker: &mut Walker,
        k: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> bool {
        let offset = DVector::from_fn(trial.dims(), |_, _| {
            (rng.gen::<f64>() - 0.5) * self.step_size
        });
        walker.proposed[k] = &walker.positions[k] + offset;
        let log_psi_new = trial.log_psi(&walker.proposed, alpha);

        let ratio = (2.0 * (log_psi_new - walker.log_psi)).exp();
        if rng.gen::<f64>() < ratio {
            walker.positions[k] = walker.proposed[k].clone();
            walker.log_psi = log_psi_new;
            true
        } else {
            walker.proposed[k] = walker.positions[k].clone();
            false
        }
    }
}

/// Drift-diffusion Metropolis-Hastings sampling guided by the quantum force.
pub struct ImportanceSampling {
    pub time_step: f64,
    pub diffusion: f64,
}

impl Propagator for ImportanceSampling {
    fn initialize(
        &self,
        trial: &dyn TrialWfn,
        n_particles: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> Walker {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let sqrt_dt = self.time_step.sqrt();
        let mut attempts = 0;
        loop {
            let positions: Vec<DVector<f64>> = (0..n_particles)
                .map(|_| DVector::from_fn(trial.dims(), |_, _| normal.sample(rng) * sqrt_dt))
                .collect();
            let walker = Walker::new(positions, trial, alpha, true);
            attempts += 1;
            if walker.log_psi.is_finite() || attempts >= MAX_INIT_ATTEMPTS {
                return walker;
            }
        }
    }

    fn step(
        &self,
        trial: &dyn TrialWfn,
        walker: &mut Walker,
        k: usize,
        alpha: f64,
        rng: &mut ChaCha20Rng,
    ) -> bool {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let sqrt_dt = self.time_step.sqrt();
        let f_old = walker.qforce[k].clone();
        let old = walker.positions[k].clone();

        walker.proposed[k] = DVector::from_fn(trial.dims(), |d, _| {
            old[d] + self.diffusion * f_old[d] * self.time_step + normal.sample(rng) * sqrt_dt
        });
        let log_psi_new = trial.log_psi(&walker.proposed, alpha);
        let f_new = trial.quantum_force(&walker.proposed, k, alpha);

        let mut greens = 0.0;
        for d in 0..trial.dims() {
            greens += 0.5
                * (f_old[d] + f_new[d])
                * (0.5 * self.diffusion * self.time_step * (f_old[d] - f_new[d])
                    - walker.proposed[k][d]
                    + old[d]);
        }

        let ratio = (greens + 2.0 * (log_psi_new - walker.log_psi)).exp();
        if rng.gen::<f64>() < ratio {
            walker.positions[k] = walker.proposed[k].clone();
            walker.log_psi = log_psi_new;
            if trial.has_pair_correlation() {
                // Moving one particle shifts the drift on every other one.
                for j in 0..walker.positions.len() {
                    walker.qforce[j] = trial.quantum_force(&walker.positions, j, alpha);
                }
            } else {
                walker.qforce[k] = f_new;
            }
            true
        } else {
            walker.proposed[k] = walker.positions[k].clone();
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::worker_rng;
    use crate::wavefunction::Gaussian3;
    use approx::assert_relative_eq;

    #[test]
    fn test_rejected_brute_force_move_leaves_state_untouched() {
        let trial = Gaussian3 { beta: 1.0 };
        let sampler = BruteForce { step_size: 4.0 };
        let mut rng = worker_rng(7, 0);
        // Large alpha and step size force frequent rejections.
        let alpha = 2.0;
        let mut walker = sampler.initialize(&trial, 5, alpha, &mut rng);

        let mut rejections = 0;
        let mut acceptances = 0;
        for _ in 0..200 {
            for k in 0..walker.n_particles() {
                let before = walker.positions.clone();
                let log_psi_before = walker.log_psi;
                if sampler.step(&trial, &mut walker, k, alpha, &mut rng) {
                    acceptances += 1;
                } else {
                    rejections += 1;
                    assert_eq!(walker.positions, before);
                    assert_eq!(walker.log_psi, log_psi_before);
                    assert_eq!(walker.proposed, walker.positions);
                }
            }
        }
        assert!(rejections > 0, "step size too small to observe a rejection");
        assert!(acceptances > 0, "chain never moved");
    }

    #[test]
    fn test_rejected_importance_move_leaves_force_untouched() {
        let trial = Gaussian3 { beta: 1.0 };
        let sampler = ImportanceSampling { time_step: 2.0, diffusion: 0.5 };
        let mut rng = worker_rng(11, 0);
        let alpha = 2.0;
        let mut walker = sampler.initialize(&trial, 4, alpha, &mut rng);

        let mut rejections = 0;
        for _ in 0..200 {
            for k in 0..walker.n_particles() {
                let positions_before = walker.positions.clone();
                let qforce_before = walker.qforce.clone();
                if !sampler.step(&trial, &mut walker, k, alpha, &mut rng) {
                    rejections += 1;
                    assert_eq!(walker.positions, positions_before);
                    assert_eq!(walker.qforce, qforce_before);
                }
            }
        }
        assert!(rejections > 0, "time step too small to observe a rejection");
    }

    #[test]
    fn test_cached_exponent_stays_consistent() {
        let trial = Gaussian3 { beta: 2.82843 };
        let sampler = BruteForce { step_size: 1.0 };
        let mut rng = worker_rng(3, 0);
        let alpha = 0.6;
        let mut walker = sampler.initialize(&trial, 8, alpha, &mut rng);

        for _ in 0..100 {
            for k in 0..walker.n_particles() {
                sampler.step(&trial, &mut walker, k, alpha, &mut rng);
            }
        }
        assert_relative_eq!(
            walker.log_psi,
            walker.recompute_log_psi(&trial, alpha),
            epsilon = 1e-9
        );
    }
}
