//! Error types for root finding.

use thiserror::Error;

use crate::evaluator::EvaluationError;

/// A specialized Result type for root-finding operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that stop a root search before it produces a result.
///
/// Running out of iterations is not represented here: a search that hits its
/// iteration cap still returns a result with `converged == false`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// First endpoint as supplied.
        a: f64,
        /// Second endpoint as supplied.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// The objective function could not be evaluated.
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Returns true if the search was rejected because of its bracket.
    #[must_use]
    pub fn is_invalid_bracket(&self) -> bool {
        matches!(self, Self::InvalidBracket { .. })
    }

    /// Returns true if the error came from the objective function.
    #[must_use]
    pub fn is_evaluation(&self) -> bool {
        matches!(self, Self::Evaluation(_))
    }
}
