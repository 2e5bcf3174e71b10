//! Round-off tolerant comparisons.
//!
//! Boundary checks inside the optimizer compare quantities that were produced
//! by long chains of floating-point operations. Comparing them exactly makes a
//! coordinate that should sit on the boundary look slightly infeasible (or the
//! other way round). The predicates here widen the comparison by a band of
//! `ROUNDOFF_FACTOR * EPSILON * baseval`, where `baseval` is a magnitude the
//! caller picks for the context (for instance the norm of the current point).

/// Machine epsilon for `f64`.
pub const EPSILON: f64 = f64::EPSILON;

/// Multiplier applied to machine epsilon to build the round-off band.
pub const ROUNDOFF_FACTOR: f64 = 10.0;

#[inline]
fn band(baseval: f64) -> f64 {
    ROUNDOFF_FACTOR * EPSILON * baseval
}

/// Returns `true` if `a < b + 10 ε baseval`.
///
/// `baseval` is the scale of the comparison and is never derived from `a` or
/// `b`. Behavior for a non-finite `baseval` is unspecified.
#[inline]
pub fn less_than(a: f64, b: f64, baseval: f64) -> bool {
    a < b + band(baseval)
}

/// Returns `true` if `a > b - 10 ε baseval`.
#[inline]
pub fn greater_than(a: f64, b: f64, baseval: f64) -> bool {
    a > b - band(baseval)
}

/// Positive infinity, used as the "no limiting constraint" sentinel.
#[inline]
pub fn infinity() -> f64 {
    f64::INFINITY
}

#[cfg(test)]
mod tests {
    use super::{EPSILON, greater_than, infinity, less_than};
    use spectral::prelude::*;

    #[test]
    fn clear_gap_is_ordered_both_ways() {
        let base = 1.0;
        assert_that!(less_than(1.0, 2.0, base)).is_true();
        assert_that!(greater_than(2.0, 1.0, base)).is_true();
        assert_that!(less_than(2.0, 1.0, base)).is_false();
        assert_that!(greater_than(1.0, 2.0, base)).is_false();
    }

    #[test]
    fn values_within_roundoff_band_compare_as_ordered() {
        // a is larger than b, but only by a couple of ulps relative to base.
        let base = 100.0;
        let b = 50.0;
        let a = b + 2.0 * EPSILON * base;
        assert_that!(less_than(a, b, base)).is_true();
        assert_that!(greater_than(b, a, base)).is_true();
    }

    #[test]
    fn band_scales_with_baseval() {
        let a = 1.0 + 1e-10;
        let b = 1.0;
        assert_that!(less_than(a, b, 1.0)).is_false();
        assert_that!(less_than(a, b, 1e7)).is_true();
    }

    #[test]
    fn zero_baseval_is_exact_comparison() {
        assert_that!(less_than(1.0, 1.0, 0.0)).is_false();
        assert_that!(greater_than(1.0, 1.0, 0.0)).is_false();
        assert_that!(less_than(0.5, 1.0, 0.0)).is_true();
    }

    #[test]
    fn infinity_dominates_any_finite_value() {
        assert_that!(infinity().is_infinite()).is_true();
        assert_that!(infinity() > f64::MAX).is_true();
        assert_that!(infinity().is_sign_positive()).is_true();
    }
}
