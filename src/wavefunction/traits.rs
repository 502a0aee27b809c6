//! Trial wave function traits for VMC calculations.
//!
//! Provides `TrialWfn`, the contract shared by all dimension-specialized
//! trial functions: per-particle exponent contribution, total log-psi,
//! per-particle local energy, drift (quantum) force and the alpha
//! log-derivative used by gradient descent.

use nalgebra::DVector;

/// Trial wave function of the form exp(Σ_p exponent(r_p)), optionally times
/// a pairwise correlation factor.
///
/// All methods are pure. Callers must supply positive `alpha`; the
/// evaluators do not guard against degenerate parameters (validation happens
/// at configuration time, before sampling starts).
pub trait TrialWfn: Send + Sync {
    /// Spatial dimensionality this evaluator was specialized for.
    fn dims(&self) -> usize;

    /// Wave-function exponent contribution of a single particle at `r`.
    fn exponent(&self, r: &DVector<f64>, alpha: f64) -> f64;

    /// Total log of the trial wave function over the whole configuration.
    ///
    /// Default is the separable sum of per-particle contributions; the
    /// interacting variant overrides this to add the pairwise term.
    fn log_psi(&self, positions: &[DVector<f64>], alpha: f64) -> f64 {
        positions.iter().map(|r| self.exponent(r, alpha)).sum()
    }

    /// Local energy contribution attributed to particle `k`.
    fn local_energy(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> f64;

    /// Drift force on particle `k`: 2 ∇_k ln ψ.
    fn quantum_force(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> DVector<f64>;

    /// ∂ ln ψ / ∂α for the whole configuration.
    fn log_derivative(&self, positions: &[DVector<f64>], alpha: f64) -> f64;

    /// Whether moving one particle changes the drift force on the others.
    fn has_pair_correlation(&self) -> bool {
        false
    }

    /// Numerical kinetic energy -½ ∇_k²ψ/ψ using central differences.
    ///
    /// Works through log-psi differences so it stays stable where ψ is tiny.
    fn numerical_kinetic(&self, positions: &[DVector<f64>], k: usize, alpha: f64, h: f64) -> f64 {
        let log0 = self.log_psi(positions, alpha);
        let mut laplacian = 0.0;
        for axis in 0..self.dims() {
            let mut fwd = positions.to_vec();
            let mut bwd = positions.to_vec();
            fwd[k][axis] += h;
            bwd[k][axis] -= h;
            let dfwd = self.log_psi(&fwd, alpha) - log0;
            let dbwd = self.log_psi(&bwd, alpha) - log0;
            laplacian += (dfwd.exp() - 2.0 + dbwd.exp()) / (h * h);
        }
        -0.5 * laplacian
    }

    /// Numerical drift force 2 ∇_k ln ψ using central differences.
    fn numerical_quantum_force(
        &self,
        positions: &[DVector<f64>],
        k: usize,
        alpha: f64,
        h: f64,
    ) -> DVector<f64> {
        let mut force = DVector::zeros(self.dims());
        for axis in 0..self.dims() {
            let mut fwd = positions.to_vec();
            let mut bwd = positions.to_vec();
            fwd[k][axis] += h;
            bwd[k][axis] -= h;
            force[axis] =
                (self.log_psi(&fwd, alpha) - self.log_psi(&bwd, alpha)) / (2.0 * h) * 2.0;
        }
        force
    }
}
