//! # rootscope Math
//!
//! Instrumented root finding for real functions of one variable.
//!
//! This crate provides:
//!
//! - **Solvers**: Brent's hybrid bracketing method (bisection, secant,
//!   inverse quadratic interpolation) returning a full per-iteration trace
//! - **Evaluators**: The [`FunctionEvaluator`](evaluator::FunctionEvaluator)
//!   capability through which solvers call the objective, with failures
//!   reported instead of silently producing NaN
//! - **Functions**: A catalogue of preset objectives with known brackets
//! - **Sampling**: Evenly spaced curve samples for plotting
//!
//! ## Design Philosophy
//!
//! - **Observable**: Every iteration is recorded with the method that produced it
//! - **Fail fast**: Bad brackets and evaluation failures are errors; running out
//!   of iterations is a result
//! - **Stateless**: Each solve owns its working state and trace

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod evaluator;
pub mod functions;
pub mod sampling;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::evaluator::{EvaluationError, Fallible, FunctionEvaluator};
    pub use crate::functions::Preset;
    pub use crate::sampling::{sample_curve, CurvePoint, SampleConfig};
    pub use crate::solvers::{
        brent, BrentResult, ConvergencePoint, IterationStep, IterationTrace, Method,
        MethodCounts, RootFinder, SolverConfig,
    };
}

pub use error::{MathError, MathResult};
