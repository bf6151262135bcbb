//! Catalogue of predefined objective functions.
//!
//! Each preset carries a display label and a bracket known to contain its
//! root, so it can be handed straight to the solver:
//!
//! ```rust
//! use rootscope_math::functions::Preset;
//! use rootscope_math::solvers::{brent, SolverConfig};
//!
//! let preset: Preset = "cos(x) - x".parse().unwrap();
//! let (a, b) = preset.bracket();
//! let result = brent(&preset, a, b, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.739_085_133_2).abs() < 1e-9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MathError;
use crate::evaluator::{ensure_finite, EvaluationError, FunctionEvaluator};

/// A predefined objective function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// x^3 - 2x - 5, Wallis' classic test equation.
    CubicShifted,
    /// x^2 - 4
    SquareMinusFour,
    /// cos(x) - x, whose root is the Dottie number.
    CosineFixedPoint,
    /// e^x - 2, root ln 2.
    ExpMinusTwo,
    /// x^3 - x - 1, root is the plastic number.
    CubicPlastic,
}

impl Preset {
    /// Every preset, in catalogue order.
    pub const ALL: [Preset; 5] = [
        Preset::CubicShifted,
        Preset::SquareMinusFour,
        Preset::CosineFixedPoint,
        Preset::ExpMinusTwo,
        Preset::CubicPlastic,
    ];

    /// Formula as displayed to users.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Preset::CubicShifted => "x^3 - 2x - 5",
            Preset::SquareMinusFour => "x^2 - 4",
            Preset::CosineFixedPoint => "cos(x) - x",
            Preset::ExpMinusTwo => "e^x - 2",
            Preset::CubicPlastic => "x^3 - x - 1",
        }
    }

    /// Short identifier for command lines and config files.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Preset::CubicShifted => "cubic",
            Preset::SquareMinusFour => "square",
            Preset::CosineFixedPoint => "cosine",
            Preset::ExpMinusTwo => "exp",
            Preset::CubicPlastic => "plastic",
        }
    }

    /// A bracket over which the function changes sign.
    #[must_use]
    pub fn bracket(self) -> (f64, f64) {
        match self {
            Preset::CubicShifted => (1.0, 3.0),
            Preset::SquareMinusFour => (0.0, 3.0),
            Preset::CosineFixedPoint | Preset::ExpMinusTwo => (0.0, 1.0),
            Preset::CubicPlastic => (1.0, 2.0),
        }
    }

    /// Evaluates the function.
    #[must_use]
    pub fn eval(self, x: f64) -> f64 {
        match self {
            Preset::CubicShifted => x * x * x - 2.0 * x - 5.0,
            Preset::SquareMinusFour => x * x - 4.0,
            Preset::CosineFixedPoint => x.cos() - x,
            Preset::ExpMinusTwo => x.exp() - 2.0,
            Preset::CubicPlastic => x * x * x - x - 1.0,
        }
    }
}

impl FunctionEvaluator for Preset {
    fn evaluate(&self, x: f64) -> Result<f64, EvaluationError> {
        ensure_finite(x, self.eval(x))
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = MathError;

    /// Accepts a slug or a label, ignoring case and whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = squash(s);
        Preset::ALL
            .into_iter()
            .find(|preset| wanted == preset.slug() || wanted == squash(preset.label()))
            .ok_or_else(|| {
                let known: Vec<&str> = Preset::ALL.iter().map(|p| p.slug()).collect();
                MathError::invalid_input(format!(
                    "unknown function '{}', expected one of: {}",
                    s.trim(),
                    known.join(", ")
                ))
            })
    }
}

fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
