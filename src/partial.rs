//! Value-with-derivatives bundles.
//!
//! Thermodynamic property functions are evaluated once per phase but consumed
//! per species. A [`PartialVector`] carries the value of a vector-valued
//! function together with its Jacobian and the Hessian of each component, and
//! [`PartialVector::component`] lets each species pull its own
//! [`PartialScalar`] slice without re-evaluating shared sub-expressions.
//!
//! Derivatives are optional. A `None` gradient or Hessian means "not
//! computed", which is a valid and distinguishable state: it is never the same
//! thing as a zero derivative.

use ndarray::{Array1, Array2, Axis};

/// Shape violations detected by [`PartialScalar::check_dimensions`] and
/// [`PartialVector::check_dimensions`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivativeError {
    #[error("gradient has {found} entries but the function has {expected} independent variables")]
    GradientDimension { expected: usize, found: usize },
    #[error(
        "Hessian of component {component} is {rows}x{cols} but the function has {expected} independent variables"
    )]
    HessianDimension {
        component: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error(
        "Jacobian is {rows}x{cols}; expected at most {components} rows of {expected} columns"
    )]
    JacobianDimension {
        components: usize,
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("{found} Hessians supplied for a function with {components} components")]
    HessianCount { components: usize, found: usize },
}

/// The result of a scalar function evaluation with its optional gradient and
/// Hessian.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialScalar {
    val: f64,
    grad: Option<Array1<f64>>,
    hessian: Option<Array2<f64>>,
}

impl PartialScalar {
    /// A bundle holding only the value.
    pub fn from_value(val: f64) -> Self {
        Self {
            val,
            grad: None,
            hessian: None,
        }
    }

    /// A bundle holding the value and the gradient.
    pub fn with_gradient(val: f64, grad: Array1<f64>) -> Self {
        Self {
            val,
            grad: Some(grad),
            hessian: None,
        }
    }

    /// A fully populated bundle.
    pub fn new(val: f64, grad: Array1<f64>, hessian: Array2<f64>) -> Self {
        Self {
            val,
            grad: Some(grad),
            hessian: Some(hessian),
        }
    }

    pub fn value(&self) -> f64 {
        self.val
    }

    pub fn gradient(&self) -> Option<&Array1<f64>> {
        self.grad.as_ref()
    }

    pub fn hessian(&self) -> Option<&Array2<f64>> {
        self.hessian.as_ref()
    }

    /// Splits the bundle into its parts.
    pub fn into_parts(self) -> (f64, Option<Array1<f64>>, Option<Array2<f64>>) {
        (self.val, self.grad, self.hessian)
    }

    /// Natural logarithm of the bundle.
    ///
    /// Chemical potentials are built as `mu0 + RT ln(a)`, so this is the one
    /// chain-rule step every activity consumer needs:
    /// `d ln v = g / v` and `d² ln v = H / v - g gᵀ / v²`.
    /// A derivative is propagated only if it was available on the input; the
    /// Hessian additionally needs the gradient.
    pub fn ln(&self) -> Self {
        let v = self.val;
        let grad = self.grad.as_ref().map(|g| g / v);
        let hessian = match (&self.grad, &self.hessian) {
            (Some(g), Some(h)) => {
                let n = g.len();
                let mut out = h / v;
                let v2 = v * v;
                for i in 0..n {
                    for j in 0..n {
                        out[[i, j]] -= g[i] * g[j] / v2;
                    }
                }
                Some(out)
            }
            _ => None,
        };
        Self {
            val: v.ln(),
            grad,
            hessian,
        }
    }

    /// Checks that the available derivatives are sized for `num_variables`
    /// independent variables.
    pub fn check_dimensions(&self, num_variables: usize) -> Result<(), DerivativeError> {
        if let Some(g) = &self.grad
            && g.len() != num_variables
        {
            return Err(DerivativeError::GradientDimension {
                expected: num_variables,
                found: g.len(),
            });
        }
        if let Some(h) = &self.hessian {
            check_square(h, num_variables, 0)?;
        }
        Ok(())
    }
}

fn check_square(h: &Array2<f64>, n: usize, component: usize) -> Result<(), DerivativeError> {
    if h.nrows() != n || h.ncols() != n {
        return Err(DerivativeError::HessianDimension {
            component,
            expected: n,
            rows: h.nrows(),
            cols: h.ncols(),
        });
    }
    Ok(())
}

/// The result of a vector-valued function evaluation with its optional
/// Jacobian and per-component Hessians.
///
/// Row `i` of the Jacobian is the gradient of component `i` and `hessians[i]`
/// is its Hessian. Either collection may be shorter than the number of
/// components; missing entries are unavailable, not zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialVector {
    val: Array1<f64>,
    jacobian: Option<Array2<f64>>,
    hessians: Vec<Array2<f64>>,
}

impl PartialVector {
    /// A bundle holding only the value.
    pub fn from_value(val: Array1<f64>) -> Self {
        Self {
            val,
            jacobian: None,
            hessians: Vec::new(),
        }
    }

    /// A bundle holding the value and the Jacobian.
    pub fn with_gradient(val: Array1<f64>, jacobian: Array2<f64>) -> Self {
        Self {
            val,
            jacobian: Some(jacobian),
            hessians: Vec::new(),
        }
    }

    /// A fully populated bundle.
    pub fn new(val: Array1<f64>, jacobian: Array2<f64>, hessians: Vec<Array2<f64>>) -> Self {
        Self {
            val,
            jacobian: Some(jacobian),
            hessians,
        }
    }

    /// Stacks per-component scalar bundles into a vector bundle.
    ///
    /// The Jacobian is assembled only if every component has a gradient and
    /// all gradients share one length; likewise for the Hessians. Otherwise
    /// the field is left unavailable rather than padded with zeros.
    pub fn from_components(components: &[PartialScalar]) -> Self {
        let val: Array1<f64> = components.iter().map(PartialScalar::value).collect();

        let grads: Option<Vec<&Array1<f64>>> =
            components.iter().map(PartialScalar::gradient).collect();
        let jacobian = grads.and_then(|rows| {
            let m = rows.first().map_or(0, |g| g.len());
            if rows.is_empty() || rows.iter().any(|g| g.len() != m) {
                return None;
            }
            let mut jac = Array2::<f64>::zeros((rows.len(), m));
            for (mut dst, g) in jac.axis_iter_mut(Axis(0)).zip(rows) {
                dst.assign(g);
            }
            Some(jac)
        });

        let hessians: Vec<Array2<f64>> = components
            .iter()
            .map(|c| c.hessian().cloned())
            .collect::<Option<Vec<_>>>()
            .unwrap_or_default();

        Self {
            val,
            jacobian,
            hessians,
        }
    }

    pub fn value(&self) -> &Array1<f64> {
        &self.val
    }

    pub fn jacobian(&self) -> Option<&Array2<f64>> {
        self.jacobian.as_ref()
    }

    pub fn hessians(&self) -> &[Array2<f64>] {
        &self.hessians
    }

    /// Splits the bundle into its parts.
    pub fn into_parts(self) -> (Array1<f64>, Option<Array2<f64>>, Vec<Array2<f64>>) {
        (self.val, self.jacobian, self.hessians)
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.val.len()
    }

    pub fn is_empty(&self) -> bool {
        self.val.is_empty()
    }

    pub fn has_jacobian(&self) -> bool {
        self.jacobian.as_ref().is_some_and(|j| j.nrows() > 0)
    }

    pub fn has_hessians(&self) -> bool {
        !self.hessians.is_empty()
    }

    /// Extracts component `i` as a scalar bundle.
    ///
    /// The gradient is row `i` of the Jacobian when that row is populated and
    /// the Hessian is `hessians[i]` when present; otherwise the field is
    /// unavailable. `i` must be less than [`len`](Self::len).
    pub fn component(&self, i: usize) -> PartialScalar {
        let val = self.val[i];
        let grad = self
            .jacobian
            .as_ref()
            .filter(|j| i < j.nrows())
            .map(|j| j.row(i).to_owned());
        let hessian = self.hessians.get(i).cloned();
        PartialScalar { val, grad, hessian }
    }

    /// Checks the populated derivative fields against `num_variables`
    /// independent variables.
    pub fn check_dimensions(&self, num_variables: usize) -> Result<(), DerivativeError> {
        let components = self.val.len();
        if let Some(j) = &self.jacobian
            && (j.nrows() > components || (j.nrows() > 0 && j.ncols() != num_variables))
        {
            return Err(DerivativeError::JacobianDimension {
                components,
                expected: num_variables,
                rows: j.nrows(),
                cols: j.ncols(),
            });
        }
        if self.hessians.len() > components {
            return Err(DerivativeError::HessianCount {
                components,
                found: self.hessians.len(),
            });
        }
        for (i, h) in self.hessians.iter().enumerate() {
            check_square(h, num_variables, i)?;
        }
        Ok(())
    }
}
