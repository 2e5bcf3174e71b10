//! Numerical building blocks for chemical equilibrium solvers.
//!
//! Gibbs-energy minimizers and reaction-path integrators repeat the same
//! inner steps: evaluate thermodynamic functions together with their
//! derivatives, keep species amounts non-negative while stepping, maintain a
//! quasi-Newton curvature estimate, and occasionally minimize along a line.
//! This crate provides those pieces as small, composable functions.
//!
//! # Modules
//! - [`tolerance`]: comparisons widened by a round-off band.
//! - [`partial`]: [`PartialScalar`] and [`PartialVector`], values bundled with
//!   optional gradients, Jacobians and Hessians, plus per-component extraction.
//! - [`step`]: [`largest_step`] and [`fraction_to_the_boundary`] for the
//!   region `x >= 0`.
//! - [`bfgs`]: the BFGS inverse-Hessian update and its curvature guard.
//! - [`golden`]: golden-section search on a bounded interval.
//! - [`species`]: elements, species and the formula matrix.
//! - [`activity`]: phase activity models returning [`PartialVector`]s.
//! - [`solver`]: [`BoundedBfgs`], a reference minimizer over `x >= 0` that
//!   exercises all of the above.
//!
//! # Example
//!
//! Evaluate ideal-gas activities once for the phase, take the log-activity of
//! one species with its derivatives, and bound a Newton-like step on the
//! amounts.
//!
//! ```
//! use equilibrium_core::{
//!     ActivityModel, Conditions, IdealActivity, fraction_to_the_boundary, largest_step,
//! };
//! use ndarray::array;
//!
//! let n = array![1.0, 3.0];
//! let conditions = Conditions::new(298.15, 1.0);
//! let activities = IdealActivity::Gaseous.activities(&conditions, &n);
//!
//! let ln_a0 = activities.component(0).ln();
//! assert!((ln_a0.value() - 0.25f64.ln()).abs() < 1e-15);
//! assert!(ln_a0.gradient().is_some());
//!
//! let dn = array![-2.0, 1.0];
//! assert_eq!(largest_step(&n, &dn), 0.5);
//! let alpha = fraction_to_the_boundary(&n, &dn, 0.99);
//! assert!((alpha - 0.495).abs() < 1e-15);
//! ```

pub mod activity;
pub mod bfgs;
pub mod golden;
pub mod partial;
pub mod solver;
pub mod species;
pub mod step;
pub mod tolerance;

pub use activity::{ActivityModel, Conditions, IdealActivity, mole_fractions};
pub use bfgs::{bfgs_update, initial_scaling, satisfies_curvature_condition};
pub use golden::{DEFAULT_GOLDEN_TOLERANCE, minimize_golden_section_search};
pub use partial::{DerivativeError, PartialScalar, PartialVector};
pub use solver::{BoundedBfgs, BoundedSolution, LineSearchStrategy, SolverError};
pub use species::{Element, Species, formula_matrix};
pub use step::{fraction_to_the_boundary, largest_step};
pub use tolerance::{greater_than, infinity, less_than};
