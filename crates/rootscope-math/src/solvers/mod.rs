//! Root-finding algorithms.
//!
//! The solver here is Brent's hybrid bracketing method. Each iteration picks
//! one of three techniques and records the choice:
//!
//! | Technique | Speed | Used when |
//! |-----------|-------|-----------|
//! | Inverse quadratic interpolation | Superlinear | Three distinct residuals are available |
//! | Secant | Superlinear | Two of the residuals coincide |
//! | Bisection | Linear | Any safeguard rejects the interpolated point |
//!
//! A solve either fails up front (bad bracket, bad configuration) or during
//! evaluation of the objective, or it returns a [`BrentResult`]. Hitting the
//! iteration cap is reported through [`BrentResult::converged`], not as an
//! error, so the best estimate and the full trace stay available.
//!
//! # Example
//!
//! ```rust
//! use rootscope_math::solvers::{brent, Method, SolverConfig};
//!
//! let f = |x: f64| x * x * x - 2.0 * x - 5.0;
//! let result = brent(&f, 1.0, 3.0, &SolverConfig::default()).unwrap();
//!
//! assert!(result.converged);
//! assert!((result.root - 2.094_551_481_5).abs() < 1e-9);
//! assert!(result.trace.method_counts().get(Method::InverseQuadratic) > 0);
//! ```

mod brent;
mod trace;

pub use brent::{brent, BrentResult};
pub use trace::{ConvergencePoint, IterationStep, IterationTrace, Method, MethodCounts};

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::evaluator::FunctionEvaluator;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Tolerance for convergence, applied to both `|f(b)|` and the bracket width.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Checks that the tolerance is positive and finite and that at least
    /// one iteration is allowed.
    pub fn validate(&self) -> MathResult<()> {
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(MathError::invalid_input(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(MathError::invalid_input(
                "max_iterations must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Brent's method bound to a configuration.
///
/// Holds no state between calls; one finder can serve any number of
/// independent solves, from any number of threads.
///
/// # Example
///
/// ```rust
/// use rootscope_math::solvers::{RootFinder, SolverConfig};
///
/// let finder = RootFinder::new(SolverConfig::default().with_tolerance(1e-12));
/// let result = finder.solve(&|x: f64| x.cos() - x, 0.0, 1.0).unwrap();
/// assert!((result.root - 0.739_085_133_2).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RootFinder {
    config: SolverConfig,
}

impl RootFinder {
    /// Creates a root finder with the given configuration.
    #[must_use]
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The configuration used by [`solve`](Self::solve).
    #[must_use]
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Finds a root of `evaluator` between `a` and `b`, in either order.
    pub fn solve<E>(&self, evaluator: &E, a: f64, b: f64) -> MathResult<BrentResult>
    where
        E: FunctionEvaluator + ?Sized,
    {
        brent(evaluator, a, b, &self.config)
    }

    /// Returns the name of the solver.
    pub fn name(&self) -> &'static str {
        "Brent"
    }
}
