//! Gaussian trial wave functions for the harmonically trapped boson gas.
//!
//! One evaluator per dimensionality, all sharing the `TrialWfn` contract.
//! The exponent of a single particle is -alpha * (x² [+ y² [+ beta z²]]);
//! the anisotropy `beta` only enters in three dimensions. `HardSphere3`
//! adds the pairwise hard-sphere Jastrow factor for interacting bosons in
//! an elliptical trap.

use std::fmt;

use nalgebra::DVector;

use super::traits::TrialWfn;

/// Errors raised while resolving the trial function at setup time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// Dimensionality outside 1..=3.
    UnsupportedDimensionality(usize),
    /// The interacting evaluator only exists in three dimensions.
    InteractionRequiresThreeDims(usize),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::UnsupportedDimensionality(d) => {
                write!(f, "unsupported dimensionality: {d} (must be 1, 2 or 3)")
            }
            SetupError::InteractionRequiresThreeDims(d) => {
                write!(f, "interaction requires 3 dimensions, got {d}")
            }
        }
    }
}

impl std::error::Error for SetupError {}

/// Resolve the trial-function evaluator once, outside all hot loops.
pub fn select_trial(
    dims: usize,
    beta: f64,
    interaction: bool,
    hard_sphere_radius: f64,
) -> Result<Box<dyn TrialWfn>, SetupError> {
    if interaction {
        return match dims {
            3 => Ok(Box::new(HardSphere3 { beta, radius: hard_sphere_radius })),
            d => Err(SetupError::InteractionRequiresThreeDims(d)),
        };
    }
    match dims {
        1 => Ok(Box::new(Gaussian1)),
        2 => Ok(Box::new(Gaussian2)),
        3 => Ok(Box::new(Gaussian3 { beta })),
        d => Err(SetupError::UnsupportedDimensionality(d)),
    }
}

/// One-dimensional Gaussian trial function exp(-alpha x²).
pub struct Gaussian1;

impl TrialWfn for Gaussian1 {
    fn dims(&self) -> usize {
        1
    }

    fn exponent(&self, r: &DVector<f64>, alpha: f64) -> f64 {
        -alpha * r[0] * r[0]
    }

    fn local_energy(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> f64 {
        let x2 = positions[k][0] * positions[k][0];
        alpha + x2 * (0.5 - 2.0 * alpha * alpha)
    }

    fn quantum_force(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> DVector<f64> {
        DVector::from_vec(vec![-4.0 * alpha * positions[k][0]])
    }

    fn log_derivative(&self, positions: &[DVector<f64>], _alpha: f64) -> f64 {
        positions.iter().map(|r| -r[0] * r[0]).sum()
    }
}

/// Two-dimensional Gaussian trial function exp(-alpha (x² + y²)).
pub struct Gaussian2;

impl TrialWfn for Gaussian2 {
    fn dims(&self) -> usize {
        2
    }

    fn exponent(&self, r: &DVector<f64>, alpha: f64) -> f64 {
        -alpha * (r[0] * r[0] + r[1] * r[1])
    }

    fn local_energy(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> f64 {
        let r = &positions[k];
        let r2 = r[0] * r[0] + r[1] * r[1];
        2.0 * alpha + r2 * (0.5 - 2.0 * alpha * alpha)
    }

    fn quantum_force(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> DVector<f64> {
        let r = &positions[k];
        DVector::from_vec(vec![-4.0 * alpha * r[0], -4.0 * alpha * r[1]])
    }

    fn log_derivative(&self, positions: &[DVector<f64>], _alpha: f64) -> f64 {
        positions.iter().map(|r| -(r[0] * r[0] + r[1] * r[1])).sum()
    }
}

/// Three-dimensional Gaussian trial function exp(-alpha (x² + y² + beta z²)).
pub struct Gaussian3 {
    pub beta: f64,
}

impl TrialWfn for Gaussian3 {
    fn dims(&self) -> usize {
        3
    }

    fn exponent(&self, r: &DVector<f64>, alpha: f64) -> f64 {
        -alpha * (r[0] * r[0] + r[1] * r[1] + self.beta * r[2] * r[2])
    }

    fn local_energy(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> f64 {
        let r = &positions[k];
        let (x2, y2, z2) = (r[0] * r[0], r[1] * r[1], r[2] * r[2]);
        let beta = self.beta;
        // -½ ∇²ψ/ψ + ½ r² with a spherical trap in natural units.
        alpha * (2.0 + beta) - 2.0 * alpha * alpha * (x2 + y2 + beta * beta * z2)
            + 0.5 * (x2 + y2 + z2)
    }

    fn quantum_force(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> DVector<f64> {
        let r = &positions[k];
        DVector::from_vec(vec![
            -4.0 * alpha * r[0],
            -4.0 * alpha * r[1],
            -4.0 * alpha * self.beta * r[2],
        ])
    }

    fn log_derivative(&self, positions: &[DVector<f64>], _alpha: f64) -> f64 {
        positions
            .iter()
            .map(|r| -(r[0] * r[0] + r[1] * r[1] + self.beta * r[2] * r[2]))
            .sum()
    }
}

/// Hard-sphere bosons in an elliptical trap (3D only).
///
/// Pairwise correlation f(r) = 1 - a/r for r > a and 0 otherwise, on top of
/// the anisotropic Gaussian orbital part. The trap uses the same anisotropy
/// constant, V = ½ (x² + y² + beta² z²).
pub struct HardSphere3 {
    pub beta: f64,
    pub radius: f64,
}

impl HardSphere3 {
    /// u(r) = ln f(r); -∞ inside the hard core so such moves are rejected.
    fn u(&self, r: f64) -> f64 {
        if r > self.radius {
            (1.0 - self.radius / r).ln()
        } else {
            f64::NEG_INFINITY
        }
    }

    /// u'(r) = a / (r (r - a)).
    fn u_prime(&self, r: f64) -> f64 {
        self.radius / (r * (r - self.radius))
    }

    /// u''(r) = 1/r² - 1/(r - a)².
    fn u_double_prime(&self, r: f64) -> f64 {
        1.0 / (r * r) - 1.0 / ((r - self.radius) * (r - self.radius))
    }

    /// Σ_{j≠k} u'(r_kj) r̂_kj, the Jastrow part of the drift on particle k.
    fn pair_gradient(&self, positions: &[DVector<f64>], k: usize) -> DVector<f64> {
        let mut grad = DVector::zeros(3);
        for (j, rj) in positions.iter().enumerate() {
            if j == k {
                continue;
            }
            let sep = &positions[k] - rj;
            let dist = sep.norm();
            grad += sep * (self.u_prime(dist) / dist);
        }
        grad
    }
}

impl TrialWfn for HardSphere3 {
    fn dims(&self) -> usize {
        3
    }

    fn exponent(&self, r: &DVector<f64>, alpha: f64) -> f64 {
        -alpha * (r[0] * r[0] + r[1] * r[1] + self.beta * r[2] * r[2])
    }

    fn log_psi(&self, positions: &[DVector<f64>], alpha: f64) -> f64 {
        let orbital: f64 = positions.iter().map(|r| self.exponent(r, alpha)).sum();
        let mut pair = 0.0;
        for j in 0..positions.len() {
            for k in j + 1..positions.len() {
                pair += self.u((&positions[j] - &positions[k]).norm());
            }
        }
        orbital + pair
    }

    fn local_energy(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> f64 {
        let r = &positions[k];
        let (x2, y2, z2) = (r[0] * r[0], r[1] * r[1], r[2] * r[2]);
        let beta = self.beta;

        // Orbital part: ∇²φ/φ and 2 ∇ln φ.
        let lap_phi = 4.0 * alpha * alpha * (x2 + y2 + beta * beta * z2)
            - 2.0 * alpha * (2.0 + beta);
        let grad_ln_phi =
            DVector::from_vec(vec![-2.0 * alpha * r[0], -2.0 * alpha * r[1], -2.0 * alpha * beta * r[2]]);

        // Jastrow part.
        let pair_grad = self.pair_gradient(positions, k);
        let mut pair_scalar = 0.0;
        for (j, rj) in positions.iter().enumerate() {
            if j == k {
                continue;
            }
            let dist = (r - rj).norm();
            pair_scalar += self.u_double_prime(dist) + 2.0 * self.u_prime(dist) / dist;
        }

        let laplacian_ratio = lap_phi
            + 2.0 * grad_ln_phi.dot(&pair_grad)
            + pair_grad.norm_squared()
            + pair_scalar;

        -0.5 * laplacian_ratio + 0.5 * (x2 + y2 + beta * beta * z2)
    }

    fn quantum_force(&self, positions: &[DVector<f64>], k: usize, alpha: f64) -> DVector<f64> {
        let r = &positions[k];
        let orbital = DVector::from_vec(vec![
            -4.0 * alpha * r[0],
            -4.0 * alpha * r[1],
            -4.0 * alpha * self.beta * r[2],
        ]);
        orbital + self.pair_gradient(positions, k) * 2.0
    }

    fn log_derivative(&self, positions: &[DVector<f64>], _alpha: f64) -> f64 {
        positions
            .iter()
            .map(|r| -(r[0] * r[0] + r[1] * r[1] + self.beta * r[2] * r[2]))
            .sum()
    }

    fn has_pair_correlation(&self) -> bool {
        true
    }
}
