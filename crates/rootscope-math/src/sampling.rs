//! Sampling an objective function for plotting.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::evaluator::FunctionEvaluator;

/// Default number of intervals between samples.
pub const DEFAULT_SAMPLES: usize = 200;

/// Default padding on each side of the bracket, as a fraction of its width.
pub const DEFAULT_PADDING: f64 = 0.2;

/// Default magnitude at or beyond which samples are dropped.
pub const DEFAULT_CLIP: f64 = 1000.0;

/// Configuration for [`sample_curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Number of intervals; `samples + 1` points are evaluated.
    pub samples: usize,
    /// Extra range on each side, as a fraction of the bracket width.
    pub padding: f64,
    /// Points with `|y| >= clip` are dropped.
    pub clip: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            padding: DEFAULT_PADDING,
            clip: DEFAULT_CLIP,
        }
    }
}

impl SampleConfig {
    /// Sets the number of intervals.
    #[must_use]
    pub fn with_samples(mut self, samples: usize) -> Self {
        self.samples = samples;
        self
    }

    /// Sets the padding fraction.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Sets the clipping magnitude.
    #[must_use]
    pub fn with_clip(mut self, clip: f64) -> Self {
        self.clip = clip;
        self
    }
}

/// A sampled point of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Abscissa.
    pub x: f64,
    /// Function value.
    pub y: f64,
}

/// Samples `evaluator` evenly over the bracket widened by `config.padding`
/// on both sides.
///
/// Points where the function cannot be evaluated, or where its magnitude
/// reaches `config.clip`, are skipped rather than reported as errors.
///
/// # Example
///
/// ```rust
/// use rootscope_math::sampling::{sample_curve, SampleConfig};
///
/// let points = sample_curve(&|x: f64| x * x - 4.0, 0.0, 3.0, &SampleConfig::default()).unwrap();
/// assert_eq!(points.len(), 201);
/// assert!((points[0].x + 0.6).abs() < 1e-12);
/// ```
pub fn sample_curve<E>(
    evaluator: &E,
    a: f64,
    b: f64,
    config: &SampleConfig,
) -> MathResult<Vec<CurvePoint>>
where
    E: FunctionEvaluator + ?Sized,
{
    if !(a.is_finite() && b.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "sampling range must be finite, got [{a}, {b}]"
        )));
    }
    if a == b {
        return Err(MathError::invalid_input("sampling range is empty"));
    }
    if config.samples == 0 {
        return Err(MathError::invalid_input("samples must be at least 1"));
    }
    if !(config.padding.is_finite() && config.padding >= 0.0) {
        return Err(MathError::invalid_input(format!(
            "padding must be finite and non-negative, got {}",
            config.padding
        )));
    }

    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    let width = hi - lo;
    let start = lo - width * config.padding;
    let end = hi + width * config.padding;
    let n = config.samples as f64;

    let points: Vec<CurvePoint> = (0..=config.samples)
        .filter_map(|i| {
            let x = start + (end - start) * i as f64 / n;
            match evaluator.evaluate(x) {
                Ok(y) if y.abs() < config.clip => Some(CurvePoint { x, y }),
                Ok(_) => None,
                Err(err) => {
                    log::trace!("skipping sample: {err}");
                    None
                }
            }
        })
        .collect();

    log::debug!(
        "sampled {} of {} points over [{start}, {end}]",
        points.len(),
        config.samples + 1
    );
    Ok(points)
}
