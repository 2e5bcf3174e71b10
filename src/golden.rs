//! Golden-section search for bounded one-dimensional minimization.

/// Default bracket-width tolerance.
pub const DEFAULT_GOLDEN_TOLERANCE: f64 = 1e-5;

/// `(sqrt(5) - 1) / 2`, the factor by which the bracket shrinks per iteration.
const INV_PHI: f64 = 0.618_033_988_749_894_9;

// The bracket after this many iterations is below 1e-41 of its initial width.
const MAX_ITERATIONS: usize = 200;

/// Approximates the minimizer of `f` over `[a, b]` by golden-section search.
///
/// `f` need not be differentiable but is assumed unimodal on the interval;
/// for other functions the result is some point of the interval. The bracket
/// is narrowed until its width is at most `tol` and the midpoint of the final
/// bracket is returned. Only the location is returned; re-evaluate `f` there
/// if the minimum value is needed.
///
/// Requires `a < b`. Otherwise no iteration takes place and the result is
/// unspecified.
pub fn minimize_golden_section_search<F>(mut f: F, a: f64, b: f64, tol: f64) -> f64
where
    F: FnMut(f64) -> f64,
{
    let (mut lo, mut hi) = (a, b);
    if lo >= hi || lo.is_nan() || hi.is_nan() {
        return 0.5 * (lo + hi);
    }

    let mut c = hi - INV_PHI * (hi - lo);
    let mut d = lo + INV_PHI * (hi - lo);
    let mut fc = f(c);
    let mut fd = f(d);

    let mut iterations = 0;
    while hi - lo > tol && iterations < MAX_ITERATIONS {
        if fc < fd {
            // the minimizer cannot lie in (d, hi]
            hi = d;
            d = c;
            fd = fc;
            c = hi - INV_PHI * (hi - lo);
            fc = f(c);
        } else {
            lo = c;
            c = d;
            fc = fd;
            d = lo + INV_PHI * (hi - lo);
            fd = f(d);
        }
        iterations += 1;
    }

    0.5 * (lo + hi)
}
