//! Per-iteration instrumentation of the bracketing solver.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The technique that produced an iteration's new point.
///
/// Purely descriptive: the solver's correctness does not depend on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Midpoint of the bracket.
    Bisection,
    /// Linear interpolation through the two bracket endpoints.
    Secant,
    /// Quadratic in `y` through the three retained points, solved at `y = 0`.
    InverseQuadratic,
}

impl Method {
    /// Human-readable name.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Method::Bisection => "Bisection",
            Method::Secant => "Secant",
            Method::InverseQuadratic => "Inverse Quadratic",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One iteration of the solver, captured before the bracket was updated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IterationStep {
    /// 1-based iteration number.
    pub iteration: u32,
    /// Bracket endpoint opposite the best estimate.
    pub a: f64,
    /// Best estimate (smallest residual) at the start of the iteration.
    pub b: f64,
    /// Previous best estimate.
    pub c: f64,
    /// f(a)
    pub fa: f64,
    /// f(b)
    pub fb: f64,
    /// f(c)
    pub fc: f64,
    /// How `new_point` was produced.
    pub method: Method,
    /// The point evaluated during this iteration.
    pub new_point: f64,
    /// Residual magnitude `|f(new_point)|`.
    pub error: f64,
}

impl IterationStep {
    /// Width of the bracket at the start of the iteration.
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.b - self.a).abs()
    }
}

/// Ordered record of every iteration of one solve.
///
/// Only the solver appends to a trace; consumers get read access.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IterationTrace {
    steps: Vec<IterationStep>,
}

impl IterationTrace {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            steps: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, step: IterationStep) {
        self.steps.push(step);
    }

    /// All steps in iteration order.
    #[must_use]
    pub fn steps(&self) -> &[IterationStep] {
        &self.steps
    }

    /// Iterates over the steps in iteration order.
    pub fn iter(&self) -> std::slice::Iter<'_, IterationStep> {
        self.steps.iter()
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if no iteration ran.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The final recorded step.
    #[must_use]
    pub fn last(&self) -> Option<&IterationStep> {
        self.steps.last()
    }

    /// Counts how often each method was used.
    #[must_use]
    pub fn method_counts(&self) -> MethodCounts {
        self.steps
            .iter()
            .fold(MethodCounts::default(), |mut counts, step| {
                match step.method {
                    Method::Bisection => counts.bisection += 1,
                    Method::Secant => counts.secant += 1,
                    Method::InverseQuadratic => counts.inverse_quadratic += 1,
                }
                counts
            })
    }

    /// Error-versus-iteration series on a log scale.
    ///
    /// Steps that landed exactly on a root have no finite logarithm and are
    /// left out.
    #[must_use]
    pub fn convergence_series(&self) -> Vec<ConvergencePoint> {
        self.steps
            .iter()
            .filter(|step| step.error > 0.0)
            .map(|step| ConvergencePoint {
                iteration: step.iteration,
                log10_error: step.error.log10(),
                method: step.method,
            })
            .collect()
    }

    pub(crate) fn into_steps(self) -> Vec<IterationStep> {
        self.steps
    }
}

impl<'a> IntoIterator for &'a IterationTrace {
    type Item = &'a IterationStep;
    type IntoIter = std::slice::Iter<'a, IterationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl IntoIterator for IterationTrace {
    type Item = IterationStep;
    type IntoIter = std::vec::IntoIter<IterationStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_steps().into_iter()
    }
}

/// How many iterations used each method.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodCounts {
    /// Bisection steps.
    pub bisection: u32,
    /// Secant steps.
    pub secant: u32,
    /// Inverse quadratic interpolation steps.
    pub inverse_quadratic: u32,
}

impl MethodCounts {
    /// Count for a single method.
    #[must_use]
    pub fn get(&self, method: Method) -> u32 {
        match method {
            Method::Bisection => self.bisection,
            Method::Secant => self.secant,
            Method::InverseQuadratic => self.inverse_quadratic,
        }
    }

    /// Total number of steps.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.bisection + self.secant + self.inverse_quadratic
    }
}

/// A point of the error-versus-iteration series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConvergencePoint {
    /// 1-based iteration number.
    pub iteration: u32,
    /// `log10(|f(new_point)|)`.
    pub log10_error: f64,
    /// Method used in that iteration.
    pub method: Method,
}
