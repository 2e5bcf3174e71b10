//! A BFGS minimizer over the non-negative orthant `x >= 0`.
//!
//! The driver strings the primitives of this crate together the way an
//! equilibrium solver does each iteration:
//!
//! 1. evaluate the objective as a [`PartialScalar`] (value and gradient),
//! 2. build a quasi-Newton direction from the inverse-Hessian approximation,
//!    freezing coordinates that sit on the boundary with a gradient pushing
//!    outward,
//! 3. cap the step with [`fraction_to_the_boundary`] so iterates stay strictly
//!    inside the region,
//! 4. search along the direction (Armijo backtracking, or a golden-section
//!    search over the admissible interval),
//! 5. apply the BFGS update when the curvature condition holds.
//!
//! Convergence is measured by the projected-gradient residual
//! `x - max(x - g, 0)`, which reduces to the gradient in the interior and to
//! `min(x_i, g_i)` on coordinates being pushed against the boundary.
//!
//! # Example
//!
//! ```
//! use equilibrium_core::{BoundedBfgs, PartialScalar};
//! use ndarray::{Array1, array};
//!
//! // Unconstrained minimum at (-1, 2); over x >= 0 it moves to (0, 2).
//! let objective = |x: &Array1<f64>| {
//!     let f = (x[0] + 1.0).powi(2) + (x[1] - 2.0).powi(2);
//!     PartialScalar::with_gradient(f, array![2.0 * (x[0] + 1.0), 2.0 * (x[1] - 2.0)])
//! };
//!
//! let solution = BoundedBfgs::new(array![3.0, 3.0], objective)
//!     .with_tolerance(1e-8)
//!     .run()
//!     .expect("solver failed");
//!
//! assert!(solution.final_point[0] >= 0.0 && solution.final_point[0] < 1e-8);
//! assert!((solution.final_point[1] - 2.0).abs() < 1e-6);
//! ```

use crate::bfgs::{bfgs_update, initial_scaling, satisfies_curvature_condition};
use crate::golden::{DEFAULT_GOLDEN_TOLERANCE, minimize_golden_section_search};
use crate::partial::{DerivativeError, PartialScalar};
use crate::step::fraction_to_the_boundary;
use crate::tolerance::less_than;
use ndarray::{Array1, Array2, Zip};

/// How the driver searches along a direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearchStrategy {
    /// Halve the step from the admissible maximum until the Armijo condition
    /// holds.
    Backtracking,
    /// Minimize the objective value over `[0, alpha_max]` by golden-section
    /// search, falling back to backtracking if the result lacks sufficient
    /// decrease.
    GoldenSection,
}

/// Errors returned by [`BoundedBfgs::run`].
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("The initial point must be finite and non-negative; entry {index} is {value}.")]
    InfeasibleStart { index: usize, value: f64 },
    #[error("The objective did not supply a gradient.")]
    GradientUnavailable,
    #[error(transparent)]
    Derivative(#[from] DerivativeError),
    #[error("The gradient contained NaN or infinity, indicating numerical instability.")]
    GradientIsNaN,
    #[error(
        "The line search failed to find a suitable step after {max_attempts} attempts. The best solution found is returned."
    )]
    LineSearchFailed {
        /// The last accepted iterate.
        last_solution: Box<BoundedSolution>,
        /// The number of attempts the line search made before failing.
        max_attempts: usize,
    },
    #[error(
        "Maximum number of iterations reached without converging. The best solution found is returned."
    )]
    MaxIterationsReached {
        /// The last accepted iterate.
        last_solution: Box<BoundedSolution>,
    },
}

/// A summary of an optimization run.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundedSolution {
    /// The point at which the minimum value was found.
    pub final_point: Array1<f64>,
    /// The objective value at `final_point`.
    pub final_value: f64,
    /// The norm of the projected-gradient residual at `final_point`.
    pub final_gradient_norm: f64,
    /// The number of iterations performed.
    pub iterations: usize,
    /// The number of objective evaluations.
    pub func_evals: usize,
    /// The number of evaluations that produced a gradient.
    pub grad_evals: usize,
}

#[derive(Debug, Default)]
struct Evaluations {
    func_evals: usize,
    grad_evals: usize,
}

struct Accepted {
    alpha: f64,
    x: Array1<f64>,
    f: f64,
    g: Array1<f64>,
}

#[derive(Debug)]
enum LineSearchError {
    MaxAttempts(usize),
    Evaluation(SolverError),
}

impl From<SolverError> for LineSearchError {
    fn from(e: SolverError) -> Self {
        LineSearchError::Evaluation(e)
    }
}

/// Configuration of the driver.
struct BoundedCore {
    x0: Array1<f64>,
    tolerance: f64,
    max_iterations: usize,
    tau: f64,
    c1: f64,
    bound_tolerance: f64,
    line_search: LineSearchStrategy,
    golden_tolerance: f64,
    max_backtracks: usize,
}

/// A configurable BFGS minimizer over `x >= 0`.
pub struct BoundedBfgs<ObjFn> {
    core: BoundedCore,
    obj_fn: ObjFn,
}

#[inline]
fn norm(v: &Array1<f64>) -> f64 {
    v.dot(v).sqrt()
}

fn optimality_residual(x: &Array1<f64>, g: &Array1<f64>) -> Array1<f64> {
    Zip::from(x)
        .and(g)
        .map_collect(|&xi, &gi| xi - (xi - gi).max(0.0))
}

fn symmetrize(mut h: Array2<f64>) -> Array2<f64> {
    let n = h.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let v = 0.5 * (h[[i, j]] + h[[j, i]]);
            h[[i, j]] = v;
            h[[j, i]] = v;
        }
    }
    h
}

fn evaluate<ObjFn>(
    obj_fn: &mut ObjFn,
    x: &Array1<f64>,
    evals: &mut Evaluations,
) -> Result<(f64, Array1<f64>), SolverError>
where
    ObjFn: FnMut(&Array1<f64>) -> PartialScalar,
{
    let bundle = obj_fn(x);
    evals.func_evals += 1;
    bundle.check_dimensions(x.len())?;
    let g = bundle
        .gradient()
        .cloned()
        .ok_or(SolverError::GradientUnavailable)?;
    evals.grad_evals += 1;
    Ok((bundle.value(), g))
}

impl BoundedCore {
    fn new(x0: Array1<f64>) -> Self {
        Self {
            x0,
            tolerance: 1e-5,
            max_iterations: 100,
            tau: 0.995,
            c1: 1e-4,
            bound_tolerance: 1e-10,
            line_search: LineSearchStrategy::Backtracking,
            golden_tolerance: DEFAULT_GOLDEN_TOLERANCE,
            max_backtracks: 50,
        }
    }

    // Coordinates on (or within `bound_tolerance` of) the boundary whose
    // gradient pushes them further out.
    fn active_mask(&self, x: &Array1<f64>, g: &Array1<f64>, scale: f64) -> Vec<bool> {
        x.iter()
            .zip(g.iter())
            .map(|(&xi, &gi)| gi > 0.0 && less_than(xi, self.bound_tolerance, scale))
            .collect()
    }

    // Zero the frozen components and any component that would leave the
    // region from a coordinate already at zero.
    fn restrict_direction(&self, x: &Array1<f64>, d: &mut Array1<f64>, active: &[bool], scale: f64) {
        for i in 0..d.len() {
            if active[i] || (d[i] < 0.0 && less_than(x[i], 0.0, scale)) {
                d[i] = 0.0;
            }
        }
    }

    fn accepts(&self, f_k: f64, slope: f64, alpha: f64, f_new: f64) -> bool {
        f_new.is_finite() && less_than(f_new, f_k + self.c1 * alpha * slope, 1.0 + f_k.abs())
    }

    fn solution(
        &self,
        x: Array1<f64>,
        f: f64,
        g: &Array1<f64>,
        iterations: usize,
        evals: &Evaluations,
    ) -> BoundedSolution {
        let residual = norm(&optimality_residual(&x, g));
        BoundedSolution {
            final_point: x,
            final_value: f,
            final_gradient_norm: residual,
            iterations,
            func_evals: evals.func_evals,
            grad_evals: evals.grad_evals,
        }
    }

    fn run<ObjFn>(&self, obj_fn: &mut ObjFn) -> Result<BoundedSolution, SolverError>
    where
        ObjFn: FnMut(&Array1<f64>) -> PartialScalar,
    {
        if let Some((index, &value)) = self
            .x0
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(SolverError::InfeasibleStart { index, value });
        }

        let n = self.x0.len();
        let mut evals = Evaluations::default();
        let mut x_k = self.x0.clone();
        let (mut f_k, mut g_k) = evaluate(obj_fn, &x_k, &mut evals)?;
        let mut h_inv = Array2::<f64>::eye(n);
        let mut h_scaled = false;

        for k in 0..self.max_iterations {
            if g_k.iter().any(|v| !v.is_finite()) {
                log::warn!("[BoundedBfgs] Non-finite gradient at iter {}", k);
                return Err(SolverError::GradientIsNaN);
            }

            let residual = norm(&optimality_residual(&x_k, &g_k));
            if residual < self.tolerance {
                let sol = self.solution(x_k, f_k, &g_k, k, &evals);
                log::info!(
                    "[BoundedBfgs] Converged: iters={}, f={:.6e}, residual={:.3e}, fe={}, ge={}",
                    k,
                    sol.final_value,
                    sol.final_gradient_norm,
                    sol.func_evals,
                    sol.grad_evals
                );
                return Ok(sol);
            }

            let scale = norm(&x_k).max(1.0);
            let active = self.active_mask(&x_k, &g_k, scale);
            let mut g_free = g_k.clone();
            for (gi, &frozen) in g_free.iter_mut().zip(active.iter()) {
                if frozen {
                    *gi = 0.0;
                }
            }

            let mut d_k = -h_inv.dot(&g_free);
            self.restrict_direction(&x_k, &mut d_k, &active, scale);
            if g_k.dot(&d_k) >= 0.0 {
                log::warn!("[BoundedBfgs] Non-descent direction; resetting to -g and H=I.");
                h_inv = Array2::eye(n);
                h_scaled = false;
                d_k = -&g_free;
                self.restrict_direction(&x_k, &mut d_k, &active, scale);
            }

            let alpha_max = fraction_to_the_boundary(&x_k, &d_k, self.tau);
            let search = match self.line_search {
                LineSearchStrategy::Backtracking => backtracking_line_search(
                    self, obj_fn, &x_k, &d_k, f_k, &g_k, alpha_max, &mut evals,
                ),
                LineSearchStrategy::GoldenSection => golden_section_line_search(
                    self, obj_fn, &x_k, &d_k, f_k, &g_k, alpha_max, &mut evals,
                ),
            };
            let accepted = match search {
                Ok(accepted) => accepted,
                Err(LineSearchError::Evaluation(e)) => return Err(e),
                Err(LineSearchError::MaxAttempts(max_attempts)) => {
                    log::warn!(
                        "[BoundedBfgs] Line search failed at iter {}: alpha_max={:.3e}, f={:.6e}",
                        k,
                        alpha_max,
                        f_k
                    );
                    let last_solution = Box::new(self.solution(x_k, f_k, &g_k, k, &evals));
                    return Err(SolverError::LineSearchFailed {
                        last_solution,
                        max_attempts,
                    });
                }
            };

            let mut s_k = &accepted.x - &x_k;
            let mut y_k = &accepted.g - &g_k;
            for (i, &frozen) in active.iter().enumerate() {
                if frozen {
                    s_k[i] = 0.0;
                    y_k[i] = 0.0;
                }
            }

            let update_status = if satisfies_curvature_condition(&s_k, &y_k) {
                if !h_scaled {
                    h_inv = Array2::eye(n) * initial_scaling(&s_k, &y_k);
                    h_scaled = true;
                }
                h_inv = symmetrize(bfgs_update(&h_inv, &s_k, &y_k));
                "applied"
            } else {
                log::warn!(
                    "[BoundedBfgs] Curvature condition failed at iter {} (sᵀy={:.3e}); skipping inverse update.",
                    k,
                    s_k.dot(&y_k)
                );
                "skipped"
            };

            log::debug!(
                "[BoundedBfgs] iter {}: alpha={:.3e} (max {:.3e}), f={:.6e} -> {:.6e}, residual={:.3e}, inverse update {}",
                k,
                accepted.alpha,
                alpha_max,
                f_k,
                accepted.f,
                residual,
                update_status
            );

            x_k = accepted.x;
            f_k = accepted.f;
            g_k = accepted.g;
        }

        let last_solution = Box::new(self.solution(x_k, f_k, &g_k, self.max_iterations, &evals));
        if last_solution.final_gradient_norm < self.tolerance {
            log::info!(
                "[BoundedBfgs] Converged on the final iteration: f={:.6e}, residual={:.3e}",
                last_solution.final_value,
                last_solution.final_gradient_norm
            );
            return Ok(*last_solution);
        }
        log::warn!(
            "[BoundedBfgs] Max iterations reached: iters={}, f={:.6e}, residual={:.3e}, fe={}, ge={}",
            self.max_iterations,
            last_solution.final_value,
            last_solution.final_gradient_norm,
            last_solution.func_evals,
            last_solution.grad_evals
        );
        Err(SolverError::MaxIterationsReached { last_solution })
    }
}

impl<ObjFn> BoundedBfgs<ObjFn>
where
    ObjFn: FnMut(&Array1<f64>) -> PartialScalar,
{
    /// Creates a new solver.
    ///
    /// # Arguments
    /// * `x0` - The initial guess; every entry must be finite and non-negative.
    /// * `obj_fn` - The objective, returning its value and gradient as a
    ///   [`PartialScalar`]. A Hessian, if present, is ignored.
    pub fn new(x0: Array1<f64>, obj_fn: ObjFn) -> Self {
        Self {
            core: BoundedCore::new(x0),
            obj_fn,
        }
    }

    /// Sets the tolerance on the projected-gradient residual (default: 1e-5).
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.core.tolerance = tolerance;
        self
    }

    /// Sets the maximum number of iterations (default: 100).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.core.max_iterations = max_iterations;
        self
    }

    /// Sets the fraction-to-the-boundary parameter `tau` in `(0, 1]`
    /// (default: 0.995).
    pub fn with_fraction_to_boundary(mut self, tau: f64) -> Self {
        self.core.tau = tau;
        self
    }

    /// Sets the Armijo sufficient-decrease constant (default: 1e-4).
    pub fn with_armijo(mut self, c1: f64) -> Self {
        self.core.c1 = c1;
        self
    }

    /// Sets the distance to zero below which a coordinate with an outward
    /// gradient is frozen on the boundary (default: 1e-10).
    pub fn with_bound_tolerance(mut self, bound_tolerance: f64) -> Self {
        self.core.bound_tolerance = bound_tolerance;
        self
    }

    /// Selects the line search (default: [`LineSearchStrategy::Backtracking`]).
    pub fn with_line_search(mut self, strategy: LineSearchStrategy) -> Self {
        self.core.line_search = strategy;
        self
    }

    /// Sets the golden-section bracket tolerance, relative to the admissible
    /// step interval (default: [`DEFAULT_GOLDEN_TOLERANCE`]).
    pub fn with_golden_tolerance(mut self, tolerance: f64) -> Self {
        self.core.golden_tolerance = tolerance;
        self
    }

    /// Sets the maximum number of step halvings per line search (default: 50).
    pub fn with_max_backtracks(mut self, max_backtracks: usize) -> Self {
        self.core.max_backtracks = max_backtracks;
        self
    }

    /// Runs the solver.
    pub fn run(&mut self) -> Result<BoundedSolution, SolverError> {
        self.core.run(&mut self.obj_fn)
    }
}

#[allow(clippy::too_many_arguments)]
fn backtracking_line_search<ObjFn>(
    core: &BoundedCore,
    obj_fn: &mut ObjFn,
    x_k: &Array1<f64>,
    d_k: &Array1<f64>,
    f_k: f64,
    g_k: &Array1<f64>,
    alpha_max: f64,
    evals: &mut Evaluations,
) -> Result<Accepted, LineSearchError>
where
    ObjFn: FnMut(&Array1<f64>) -> PartialScalar,
{
    let slope = g_k.dot(d_k);
    let mut alpha = alpha_max;
    for attempt in 0..core.max_backtracks {
        if alpha <= 0.0 {
            log::debug!("[BoundedBfgs Backtracking] No admissible step (attempt {}).", attempt);
            break;
        }
        let x_new = x_k + &(alpha * d_k);
        let (f_new, g_new) = evaluate(obj_fn, &x_new, evals)?;
        if g_new.iter().all(|v| v.is_finite()) && core.accepts(f_k, slope, alpha, f_new) {
            return Ok(Accepted {
                alpha,
                x: x_new,
                f: f_new,
                g: g_new,
            });
        }
        alpha *= 0.5;
    }
    Err(LineSearchError::MaxAttempts(core.max_backtracks))
}

#[allow(clippy::too_many_arguments)]
fn golden_section_line_search<ObjFn>(
    core: &BoundedCore,
    obj_fn: &mut ObjFn,
    x_k: &Array1<f64>,
    d_k: &Array1<f64>,
    f_k: f64,
    g_k: &Array1<f64>,
    alpha_max: f64,
    evals: &mut Evaluations,
) -> Result<Accepted, LineSearchError>
where
    ObjFn: FnMut(&Array1<f64>) -> PartialScalar,
{
    let alpha = minimize_golden_section_search(
        |alpha| {
            evals.func_evals += 1;
            let value = obj_fn(&(x_k + &(alpha * d_k))).value();
            if value.is_nan() { f64::INFINITY } else { value }
        },
        0.0,
        alpha_max,
        core.golden_tolerance * alpha_max,
    );

    if alpha > 0.0 {
        let x_new = x_k + &(alpha * d_k);
        let (f_new, g_new) = evaluate(obj_fn, &x_new, evals)?;
        if g_new.iter().all(|v| v.is_finite()) && core.accepts(f_k, g_k.dot(d_k), alpha, f_new) {
            return Ok(Accepted {
                alpha,
                x: x_new,
                f: f_new,
                g: g_new,
            });
        }
    }
    log::debug!(
        "[BoundedBfgs Golden] alpha={:.3e} lacks sufficient decrease; backtracking instead.",
        alpha
    );
    backtracking_line_search(core, obj_fn, x_k, d_k, f_k, g_k, alpha_max, evals)
}

#[cfg(test)]
mod tests {
    // The suite covers:
    // 1. Convergence in the interior and on the boundary, for both line searches.
    // 2. Feasibility of every evaluated point.
    // 3. Failure paths: infeasible start, missing or mis-sized gradient, and
    //    the iteration limit.

    use super::{BoundedBfgs, BoundedSolution, LineSearchStrategy, SolverError};
    use crate::partial::{DerivativeError, PartialScalar};
    use ndarray::{Array1, array};
    use spectral::prelude::*;

    // --- Test Functions ---

    /// Separable quadratic with its minimum at (1, 2), inside the region.
    fn interior_quadratic(x: &Array1<f64>) -> PartialScalar {
        let f = (x[0] - 1.0).powi(2) + (x[1] - 2.0).powi(2);
        PartialScalar::with_gradient(f, array![2.0 * (x[0] - 1.0), 2.0 * (x[1] - 2.0)])
    }

    /// Unconstrained minimum at (-1, 2); constrained minimum at (0, 2).
    fn boundary_quadratic(x: &Array1<f64>) -> PartialScalar {
        let f = (x[0] + 1.0).powi(2) + (x[1] - 2.0).powi(2);
        PartialScalar::with_gradient(f, array![2.0 * (x[0] + 1.0), 2.0 * (x[1] - 2.0)])
    }

    /// Coupled quadratic; the constrained minimum is (1, 0, 2) with x[1] pinned.
    fn coupled_quadratic(x: &Array1<f64>) -> PartialScalar {
        let r = x[0] + x[1] + x[2] - 3.0;
        let f = (x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2) + r * r;
        PartialScalar::with_gradient(
            f,
            array![
                2.0 * (x[0] - 1.0) + 2.0 * r,
                2.0 * (x[1] + 2.0) + 2.0 * r,
                2.0 * r
            ],
        )
    }

    fn rosenbrock(x: &Array1<f64>) -> PartialScalar {
        let a = 1.0;
        let b = 100.0;
        let f = (a - x[0]).powi(2) + b * (x[1] - x[0].powi(2)).powi(2);
        let g = array![
            -2.0 * (a - x[0]) - 4.0 * b * (x[1] - x[0].powi(2)) * x[0],
            2.0 * b * (x[1] - x[0].powi(2))
        ];
        PartialScalar::with_gradient(f, g)
    }

    // --- 1. Convergence ---

    #[test]
    fn interior_minimum_is_found() {
        let BoundedSolution { final_point, .. } = BoundedBfgs::new(array![5.0, 5.0], interior_quadratic)
            .with_tolerance(1e-8)
            .run()
            .unwrap();
        assert_that!(final_point[0]).is_close_to(1.0, 1e-6);
        assert_that!(final_point[1]).is_close_to(2.0, 1e-6);
    }

    #[test]
    fn boundary_minimum_is_approached_from_inside() {
        let sol = BoundedBfgs::new(array![3.0, 3.0], boundary_quadratic)
            .with_tolerance(1e-8)
            .run()
            .unwrap();
        assert_that!(sol.final_point[0] >= 0.0).is_true();
        assert_that!(sol.final_point[0]).is_close_to(0.0, 1e-8);
        assert_that!(sol.final_point[1]).is_close_to(2.0, 1e-6);
        assert_that!(sol.final_value).is_close_to(1.0, 1e-6);
        assert_that!(sol.final_gradient_norm).is_less_than(1e-8);
    }

    #[test]
    fn golden_section_line_search_converges() {
        type Objective = fn(&Array1<f64>) -> PartialScalar;
        let cases = [
            (array![5.0, 5.0], interior_quadratic as Objective, [1.0, 2.0]),
            (array![3.0, 3.0], boundary_quadratic as Objective, [0.0, 2.0]),
        ];
        for (x0, f, expected) in cases {
            let sol = BoundedBfgs::new(x0, f)
                .with_line_search(LineSearchStrategy::GoldenSection)
                .with_tolerance(1e-8)
                .run()
                .unwrap();
            assert_that!(sol.final_point[0]).is_close_to(expected[0], 1e-6);
            assert_that!(sol.final_point[1]).is_close_to(expected[1], 1e-6);
        }
    }

    #[test]
    fn rosenbrock_converges_inside_the_region() {
        let sol = BoundedBfgs::new(array![0.2, 0.8], rosenbrock)
            .with_tolerance(1e-6)
            .with_max_iterations(1000)
            .run()
            .unwrap();
        assert_that!(sol.final_point[0]).is_close_to(1.0, 1e-3);
        assert_that!(sol.final_point[1]).is_close_to(1.0, 1e-3);
    }

    #[test]
    fn beginning_at_minimum_terminates_immediately() {
        let BoundedSolution { iterations, .. } = BoundedBfgs::new(array![0.0, 2.0], boundary_quadratic)
            .run()
            .unwrap();
        assert_that!(iterations).is_equal_to(0);
    }

    // --- 2. Feasibility ---

    #[test]
    fn every_evaluated_point_is_feasible() {
        let mut visited: Vec<Array1<f64>> = Vec::new();
        let result = BoundedBfgs::new(array![2.0, 0.5, 1.5], |x: &Array1<f64>| {
            visited.push(x.clone());
            coupled_quadratic(x)
        })
        .with_tolerance(1e-7)
        .with_max_iterations(200)
        .run();

        let sol = result.unwrap();
        assert_that!(visited.len()).is_greater_than(1);
        for x in &visited {
            assert_that!(x.iter().all(|&v| v >= 0.0)).is_true();
        }
        assert_that!(sol.final_point[1]).is_close_to(0.0, 1e-7);
    }

    // --- 3. Failure paths ---

    #[test]
    fn infeasible_start_is_rejected() {
        let result = BoundedBfgs::new(array![1.0, -0.5], interior_quadratic).run();
        match result {
            Err(SolverError::InfeasibleStart { index, value }) => {
                assert_eq!(index, 1);
                assert_eq!(value, -0.5);
            }
            other => panic!("expected InfeasibleStart, got {other:?}"),
        }
    }

    #[test]
    fn objective_without_gradient_is_rejected() {
        let result =
            BoundedBfgs::new(array![1.0, 1.0], |x: &Array1<f64>| PartialScalar::from_value(x.sum()))
                .run();
        assert_that!(matches!(result, Err(SolverError::GradientUnavailable))).is_true();
    }

    #[test]
    fn mis_sized_gradient_is_reported() {
        let result = BoundedBfgs::new(array![1.0, 1.0], |x: &Array1<f64>| {
            PartialScalar::with_gradient(x.sum(), array![1.0])
        })
        .run();
        assert_that!(matches!(
            result,
            Err(SolverError::Derivative(DerivativeError::GradientDimension {
                expected: 2,
                found: 1
            }))
        ))
        .is_true();
    }

    #[test]
    fn nan_gradient_returns_error() {
        let result = BoundedBfgs::new(array![1.0], |x: &Array1<f64>| {
            PartialScalar::with_gradient(x[0], array![f64::NAN])
        })
        .run();
        assert_that!(matches!(result, Err(SolverError::GradientIsNaN))).is_true();
    }

    #[test]
    fn max_iterations_error_is_returned() {
        let max_iterations = 3;
        let result = BoundedBfgs::new(array![0.2, 0.8], rosenbrock)
            .with_max_iterations(max_iterations)
            .run();

        match result {
            Err(SolverError::MaxIterationsReached { last_solution }) => {
                assert_eq!(last_solution.iterations, max_iterations);
                assert!(last_solution.final_point.iter().all(|&v| v >= 0.0));
                assert!(last_solution.final_value < rosenbrock(&array![0.2, 0.8]).value());
            }
            other => panic!("expected MaxIterationsReached, got {other:?}"),
        }
    }
}
