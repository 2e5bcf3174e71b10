//! Activity models at the solver boundary.
//!
//! A phase evaluates the activities of all its species at once and hands them
//! to the optimizer as a [`PartialVector`] with derivatives taken with respect
//! to the phase's molar amounts. How a model arrives at those derivatives is
//! its own business; the bundle is the whole contract.

use crate::partial::PartialVector;
use ndarray::{Array1, Array2};

/// Standard-state pressure in bar.
pub const STANDARD_PRESSURE: f64 = 1.0;

/// Temperature (K) and pressure (bar) at which a phase is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    pub temperature: f64,
    pub pressure: f64,
}

impl Conditions {
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self {
            temperature,
            pressure,
        }
    }
}

/// A phase-level activity evaluator.
pub trait ActivityModel {
    /// Activities of the phase's species at `conditions` for the molar
    /// amounts `n`, with derivatives with respect to `n`.
    fn activities(&self, conditions: &Conditions, n: &Array1<f64>) -> PartialVector;
}

/// Mole fractions `x_i = n_i / N` with their Jacobian and Hessians.
///
/// With `N = sum(n)`:
/// `dx_i/dn_j = (δ_ij - x_i) / N` and
/// `d²x_i/dn_j dn_k = (2 x_i - δ_ij - δ_ik) / N²`.
///
/// If the total amount is not positive the fractions are undefined; the
/// result is then a zero value with no derivatives.
pub fn mole_fractions(n: &Array1<f64>) -> PartialVector {
    let m = n.len();
    let total = n.sum();
    if !(total.is_finite() && total > 0.0) {
        return PartialVector::from_value(Array1::zeros(m));
    }

    let x = n / total;
    let jacobian = Array2::from_shape_fn((m, m), |(i, j)| {
        let dij = if i == j { 1.0 } else { 0.0 };
        (dij - x[i]) / total
    });
    let total2 = total * total;
    let hessians = (0..m)
        .map(|i| {
            Array2::from_shape_fn((m, m), |(j, k)| {
                let dij = if i == j { 1.0 } else { 0.0 };
                let dik = if i == k { 1.0 } else { 0.0 };
                (2.0 * x[i] - dij - dik) / total2
            })
        })
        .collect();

    PartialVector::new(x, jacobian, hessians)
}

/// The ideal mixture: activity equals mole fraction, times `P / P°` for
/// gaseous phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdealActivity {
    Condensed,
    Gaseous,
}

impl ActivityModel for IdealActivity {
    fn activities(&self, conditions: &Conditions, n: &Array1<f64>) -> PartialVector {
        let fractions = mole_fractions(n);
        match self {
            IdealActivity::Condensed => fractions,
            IdealActivity::Gaseous => {
                let factor = conditions.pressure / STANDARD_PRESSURE;
                let (val, jacobian, hessians) = fractions.into_parts();
                let val = val * factor;
                let hessians: Vec<Array2<f64>> =
                    hessians.into_iter().map(|h| h * factor).collect();
                match jacobian {
                    Some(j) => PartialVector::new(val, j * factor, hessians),
                    None => PartialVector::from_value(val),
                }
            }
        }
    }
}
