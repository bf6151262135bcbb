//! The objective-function capability consumed by the solvers.
//!
//! Solvers never call a closure directly; they go through
//! [`FunctionEvaluator`], which lets a function report that it is undefined
//! at a point instead of handing back a NaN that would corrupt the bracket.
//!
//! Any `Fn(f64) -> f64` is an evaluator. Non-finite outputs are turned into
//! [`EvaluationError::NonFinite`]:
//!
//! ```rust
//! use rootscope_math::evaluator::{EvaluationError, FunctionEvaluator};
//!
//! let f = |x: f64| 1.0 / x;
//! assert_eq!(f.evaluate(2.0), Ok(0.5));
//! assert!(matches!(f.evaluate(0.0), Err(EvaluationError::NonFinite { .. })));
//! ```
//!
//! Functions with their own domain checks are wrapped in [`Fallible`]:
//!
//! ```rust
//! use rootscope_math::evaluator::{EvaluationError, Fallible, FunctionEvaluator};
//!
//! let ln = Fallible(|x: f64| {
//!     if x <= 0.0 {
//!         Err(EvaluationError::undefined(x, "logarithm of a non-positive number"))
//!     } else {
//!         Ok(x.ln())
//!     }
//! });
//! assert!(ln.evaluate(-1.0).is_err());
//! ```

use thiserror::Error;

/// Failure to evaluate the objective function at a point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    /// The function is not defined at `x` (domain error, division by zero, ...).
    #[error("Function undefined at x = {x}: {reason}")]
    Undefined {
        /// The point that was evaluated.
        x: f64,
        /// Why the function has no value there.
        reason: String,
    },

    /// The function returned NaN or an infinity.
    #[error("Function produced a non-finite value at x = {x}: {value}")]
    NonFinite {
        /// The point that was evaluated.
        x: f64,
        /// The value returned.
        value: f64,
    },
}

impl EvaluationError {
    /// Creates an undefined-point error.
    #[must_use]
    pub fn undefined(x: f64, reason: impl Into<String>) -> Self {
        Self::Undefined {
            x,
            reason: reason.into(),
        }
    }

    /// Returns the point at which evaluation failed.
    #[must_use]
    pub fn x(&self) -> f64 {
        match self {
            Self::Undefined { x, .. } | Self::NonFinite { x, .. } => *x,
        }
    }
}

/// A real-valued function of one real variable that may fail.
pub trait FunctionEvaluator {
    /// Evaluates the function at `x`.
    ///
    /// Implementations must return an error rather than a non-finite value.
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError>;
}

impl<F> FunctionEvaluator for F
where
    F: Fn(f64) -> f64,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        ensure_finite(x, self(x))
    }
}

/// Adapter for closures that report their own evaluation failures.
///
/// Values the closure returns are still checked for finiteness.
#[derive(Debug, Clone, Copy)]
pub struct Fallible<F>(pub F);

impl<F> FunctionEvaluator for Fallible<F>
where
    F: Fn(f64) -> Result<f64, EvaluationError>,
{
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        (self.0)(x).and_then(|value| ensure_finite(x, value))
    }
}

pub(crate) fn ensure_finite(x: f64, value: f64) -> Result<f64, EvaluationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EvaluationError::NonFinite { x, value })
    }
}
