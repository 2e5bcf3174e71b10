//! Step-length control for the non-negativity region `x >= 0`.

use crate::tolerance::infinity;
use ndarray::{Array1, Zip};

/// Largest `alpha >= 0` such that `p + alpha * dp` stays component-wise
/// non-negative.
///
/// This is the exact boundary-hitting step: `min(-p[i] / dp[i])` over the
/// components with `dp[i] < 0`. Returns [`infinity()`] when no component of
/// `dp` is negative, including for empty inputs. A coordinate already at zero
/// with a negative direction yields `0`.
///
/// `p` and `dp` must have the same length.
pub fn largest_step(p: &Array1<f64>, dp: &Array1<f64>) -> f64 {
    Zip::from(p)
        .and(dp)
        .fold(infinity(), |alpha, &pi, &dpi| {
            if dpi < 0.0 { alpha.min(-pi / dpi) } else { alpha }
        })
}

/// Fraction-to-the-boundary step length.
///
/// Returns `max { alpha in (0, 1] : p + alpha * dp >= (1 - tau) p }` for a
/// shrink parameter `tau` in `(0, 1]`, computed as
/// `min(1, min(-tau * p[i] / dp[i]))` over the components with `dp[i] < 0`.
/// The next iterate therefore closes at most a `tau` fraction of the distance
/// to zero on any coordinate. Returns `1` when no component of `dp` is
/// negative.
pub fn fraction_to_the_boundary(p: &Array1<f64>, dp: &Array1<f64>, tau: f64) -> f64 {
    Zip::from(p).and(dp).fold(1.0, |alpha: f64, &pi, &dpi| {
        if dpi < 0.0 {
            alpha.min(-tau * pi / dpi)
        } else {
            alpha
        }
    })
}
