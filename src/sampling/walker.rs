//! Walker state for the Metropolis random walk.

use nalgebra::DVector;

use crate::wavefunction::TrialWfn;

/// Current and proposed configuration of one random walk, together with the
/// cached total wave-function exponent and the drift force field.
///
/// Exactly one committed and one proposed configuration exist at any time;
/// `proposed` differs from `positions` in at most one particle while a step
/// is in flight and is restored on rejection.
pub struct Walker {
    /// Committed positions, one vector per particle.
    pub positions: Vec<DVector<f64>>,
    /// Proposal buffer for the particle currently being moved.
    pub proposed: Vec<DVector<f64>>,
    /// Drift force per particle (empty for brute-force sampling).
    pub qforce: Vec<DVector<f64>>,
    /// Cached total exponent ln ψ of the committed configuration.
    pub log_psi: f64,
}

impl Walker {
    /// Build a walker from freshly drawn positions.
    pub fn new(
        positions: Vec<DVector<f64>>,
        trial: &dyn TrialWfn,
        alpha: f64,
        with_force: bool,
    ) -> Self {
        let log_psi = trial.log_psi(&positions, alpha);
        let qforce = if with_force {
            (0..positions.len())
                .map(|k| trial.quantum_force(&positions, k, alpha))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            proposed: positions.clone(),
            positions,
            qforce,
            log_psi,
        }
    }

    pub fn n_particles(&self) -> usize {
        self.positions.len()
    }

    /// Recompute the total exponent from the committed positions.
    ///
    /// This is the authority against which the incrementally maintained
    /// `log_psi` is validated.
    pub fn recompute_log_psi(&self, trial: &dyn TrialWfn, alpha: f64) -> f64 {
        trial.log_psi(&self.positions, alpha)
    }
}
