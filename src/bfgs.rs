//! BFGS inverse-Hessian approximation.
//!
//! The update is a pure function of the previous approximation, the step `s`
//! and the gradient change `y`. The approximation itself lives in the
//! optimizer's iteration state and is threaded through successive calls.

use crate::tolerance::less_than;
use ndarray::{Array1, Array2};

/// Applies the BFGS rank-two update to an inverse-Hessian approximation:
///
/// `H' = (I - rho s yᵀ) H (I - rho y sᵀ) + rho s sᵀ` with `rho = 1 / (yᵀ s)`.
///
/// Requires `yᵀ s > 0` for `H'` to stay positive definite; the update does
/// not guard against a violated curvature condition, see
/// [`satisfies_curvature_condition`].
pub fn bfgs_update(h: &Array2<f64>, s: &Array1<f64>, y: &Array1<f64>) -> Array2<f64> {
    let n = s.len();
    let rho = 1.0 / y.dot(s);

    // left = I - rho s yᵀ; right = leftᵀ = I - rho y sᵀ
    let mut left = Array2::<f64>::eye(n);
    for i in 0..n {
        for j in 0..n {
            left[[i, j]] -= rho * s[i] * y[j];
        }
    }
    let right = left.t();

    let mut updated = left.dot(h).dot(&right);
    for i in 0..n {
        for j in 0..n {
            updated[[i, j]] += rho * s[i] * s[j];
        }
    }
    updated
}

/// Whether `yᵀ s` is positive beyond round-off relative to `‖s‖ ‖y‖`.
pub fn satisfies_curvature_condition(s: &Array1<f64>, y: &Array1<f64>) -> bool {
    let sy = s.dot(y);
    let scale = s.dot(s).sqrt() * y.dot(y).sqrt();
    sy.is_finite() && sy > 0.0 && !less_than(sy, 0.0, scale)
}

/// Scaling `yᵀ s / yᵀ y` for the identity used before the first update,
/// clamped to `[1e-3, 1e3]`. Falls back to `1` when undefined.
pub fn initial_scaling(s: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let sy = s.dot(y);
    let yy = y.dot(y);
    let scale = if sy > 0.0 && yy > 0.0 { sy / yy } else { 1.0 };
    if scale.is_finite() {
        scale.clamp(1e-3, 1e3)
    } else {
        1.0
    }
}
