//! Trap VMC - Variational Monte Carlo for trapped bosons
//!
//! This crate estimates the ground-state energy of a harmonically trapped
//! many-boson system with a Gaussian trial wave function. Configurations are
//! sampled with brute-force or importance-sampled Metropolis moves, and the
//! variational parameter is swept over a fixed grid or refined by gradient
//! descent.

pub mod io;
pub mod sampling;
pub mod wavefunction;

// Re-export commonly used types at crate root
pub use io::{read_run_config, ConfigError, RunConfig, SamplingConfig, SweepConfig};
pub use sampling::{
    run_sweep, sample_alpha, worker_rng, Accumulator, AlphaRun, BruteForce, FixedGridSweep,
    GradientDescent, ImportanceSampling, ParameterSchedule, Propagator, StatisticsRow,
    SweepResults, VmcParams, Walker,
};
pub use wavefunction::{
    select_trial, Gaussian1, Gaussian2, Gaussian3, HardSphere3, SetupError, TrialWfn,
};

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::DVector;
    use rand::Rng;

    use crate::wavefunction::{Gaussian1, Gaussian2, Gaussian3, HardSphere3, TrialWfn};

    fn random_positions(dims: usize, n: usize, rng: &mut impl Rng) -> Vec<DVector<f64>> {
        (0..n)
            .map(|_| DVector::from_fn(dims, |_, _| rng.gen::<f64>() * 2.0 - 1.0))
            .collect()
    }

    /// Harmonic trap potential matching each evaluator's convention.
    fn trap_potential(r: &DVector<f64>) -> f64 {
        0.5 * r.norm_squared()
    }

    #[test]
    fn test_local_energy_matches_numerical_kinetic_1d() {
        let trial = Gaussian1;
        let mut rng = crate::worker_rng(1, 0);
        let alpha = 0.37;
        for _ in 0..10 {
            let positions = random_positions(1, 3, &mut rng);
            for k in 0..positions.len() {
                let analytic = trial.local_energy(&positions, k, alpha);
                let numerical =
                    trial.numerical_kinetic(&positions, k, alpha, 1e-4) + trap_potential(&positions[k]);
                assert_relative_eq!(analytic, numerical, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_local_energy_matches_numerical_kinetic_2d() {
        let trial = Gaussian2;
        let mut rng = crate::worker_rng(2, 0);
        let alpha = 0.61;
        for _ in 0..10 {
            let positions = random_positions(2, 3, &mut rng);
            for k in 0..positions.len() {
                let analytic = trial.local_energy(&positions, k, alpha);
                let numerical =
                    trial.numerical_kinetic(&positions, k, alpha, 1e-4) + trap_potential(&positions[k]);
                assert_relative_eq!(analytic, numerical, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_local_energy_matches_numerical_kinetic_3d() {
        let trial = Gaussian3 { beta: 2.82843 };
        let mut rng = crate::worker_rng(3, 0);
        let alpha = 0.45;
        for _ in 0..10 {
            let positions = random_positions(3, 4, &mut rng);
            for k in 0..positions.len() {
                let analytic = trial.local_energy(&positions, k, alpha);
                let numerical =
                    trial.numerical_kinetic(&positions, k, alpha, 1e-4) + trap_potential(&positions[k]);
                assert_relative_eq!(analytic, numerical, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_interacting_local_energy_matches_numerical_kinetic() {
        let trial = HardSphere3 { beta: 1.0, radius: 0.1 };
        let alpha = 0.5;
        // Well-separated particles so every finite-difference displacement
        // stays outside the hard cores.
        let positions = vec![
            DVector::from_vec(vec![1.0, 0.0, 0.2]),
            DVector::from_vec(vec![-0.8, 0.7, -0.3]),
            DVector::from_vec(vec![0.1, -1.1, 0.9]),
        ];
        for k in 0..positions.len() {
            let r = &positions[k];
            let potential =
                0.5 * (r[0] * r[0] + r[1] * r[1] + trial.beta * trial.beta * r[2] * r[2]);
            let analytic = trial.local_energy(&positions, k, alpha);
            let numerical = trial.numerical_kinetic(&positions, k, alpha, 1e-5) + potential;
            assert_relative_eq!(analytic, numerical, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_quantum_force_matches_numerical_gradient() {
        let trial = Gaussian3 { beta: 2.82843 };
        let mut rng = crate::worker_rng(4, 0);
        let alpha = 0.52;
        let positions = random_positions(3, 3, &mut rng);
        for k in 0..positions.len() {
            let analytic = trial.quantum_force(&positions, k, alpha);
            let numerical = trial.numerical_quantum_force(&positions, k, alpha, 1e-5);
            for d in 0..3 {
                assert_relative_eq!(analytic[d], numerical[d], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_interacting_quantum_force_matches_numerical_gradient() {
        let trial = HardSphere3 { beta: 1.0, radius: 0.1 };
        let alpha = 0.5;
        let positions = vec![
            DVector::from_vec(vec![1.0, 0.0, 0.2]),
            DVector::from_vec(vec![-0.8, 0.7, -0.3]),
        ];
        for k in 0..positions.len() {
            let analytic = trial.quantum_force(&positions, k, alpha);
            let numerical = trial.numerical_quantum_force(&positions, k, alpha, 1e-5);
            for d in 0..3 {
                assert_relative_eq!(analytic[d], numerical[d], epsilon = 1e-5);
            }
        }
    }
}
