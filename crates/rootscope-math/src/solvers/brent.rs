//! Brent's root-finding algorithm with per-iteration tracing.

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::evaluator::FunctionEvaluator;
use crate::solvers::trace::{IterationStep, IterationTrace, Method};
use crate::solvers::SolverConfig;

/// Outcome of a Brent solve.
///
/// `converged == false` means the iteration cap was reached; `root` is then
/// the best estimate found so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrentResult {
    /// The root estimate (the bracket endpoint with the smaller residual).
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Whether a convergence criterion was met before the cap.
    pub converged: bool,
    /// Function value at `root`.
    pub residual: f64,
    /// Every iteration, in order.
    pub trace: IterationTrace,
}

impl BrentResult {
    /// The recorded iterations.
    #[must_use]
    pub fn steps(&self) -> &[IterationStep] {
        self.trace.steps()
    }
}

/// Brent's root-finding algorithm.
///
/// Combines the reliability of bisection with the speed of the secant method
/// and inverse quadratic interpolation, and records every iteration in the
/// returned [`IterationTrace`].
///
/// Requires `f(a)` and `f(b)` not to share a sign. The endpoints may be given
/// in either order.
///
/// # Arguments
///
/// * `evaluator` - The function for which to find a root
/// * `a` - One end of the bracket
/// * `b` - The other end of the bracket
/// * `config` - Solver configuration
///
/// # Errors
///
/// * [`MathError::InvalidInput`] for a non-finite endpoint or an invalid config
/// * [`MathError::InvalidBracket`] if `f(a)` and `f(b)` have the same sign
/// * [`MathError::Evaluation`] if the function fails at any point it is asked for
///
/// # Example
///
/// ```rust
/// use rootscope_math::solvers::{brent, SolverConfig};
///
/// // Find root of x^3 - x - 2
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let result = brent(&f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!(f(result.root).abs() < 1e-10);
/// assert_eq!(result.steps().len() as u32, result.iterations);
/// ```
pub fn brent<E>(evaluator: &E, a: f64, b: f64, config: &SolverConfig) -> MathResult<BrentResult>
where
    E: FunctionEvaluator + ?Sized,
{
    config.validate()?;
    if !(a.is_finite() && b.is_finite()) {
        return Err(MathError::invalid_input(format!(
            "bracket endpoints must be finite, got [{a}, {b}]"
        )));
    }

    let fa = evaluator.evaluate(a)?;
    let fb = evaluator.evaluate(b)?;

    // Check that root is bracketed
    if same_sign(fa, fb) {
        log::debug!("rejecting bracket [{a}, {b}]: f(a) = {fa:e}, f(b) = {fb:e}");
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }

    log::debug!(
        "brent: bracket [{a}, {b}], tolerance {:e}, max {} iterations",
        config.tolerance,
        config.max_iterations
    );

    let mut state = AlgorithmState::new(a, fa, b, fb);
    let mut trace = IterationTrace::with_capacity(config.max_iterations.min(64) as usize);

    for iteration in 1..=config.max_iterations {
        let (s, method) = state.next_point(config.tolerance);
        let fs = evaluator.evaluate(s)?;

        let step = state.record(iteration, method, s, fs);
        log::trace!(
            "iteration {iteration}: {method} s = {s}, |f(s)| = {:e}, width = {:e}",
            step.error,
            step.width()
        );
        trace.push(step);

        state.advance(s, fs);

        if state.converged(config.tolerance) {
            log::debug!("brent: converged to {} after {iteration} iterations", state.b);
            return Ok(BrentResult {
                root: state.b,
                iterations: iteration,
                converged: true,
                residual: state.fb,
                trace,
            });
        }
    }

    log::debug!(
        "brent: no convergence after {} iterations, best estimate {} (|f| = {:e})",
        config.max_iterations,
        state.b,
        state.fb.abs()
    );

    Ok(BrentResult {
        root: state.b,
        iterations: config.max_iterations,
        converged: false,
        residual: state.fb,
        trace,
    })
}

/// True when both values are nonzero with the same sign.
///
/// Compares signs directly; `fa * fb` underflows to zero for tiny residuals.
/// `(a + b) / 2` without overflow for endpoints near `f64::MAX`.
fn midpoint(a: f64, b: f64) -> f64 {
    0.5 * a + 0.5 * b
}

fn same_sign(x: f64, y: f64) -> bool {
    (x > 0.0 && y > 0.0) || (x < 0.0 && y < 0.0)
}

fn opposite_signs(x: f64, y: f64) -> bool {
    (x > 0.0 && y < 0.0) || (x < 0.0 && y > 0.0)
}

/// Working set carried between iterations.
///
/// `b` is always the endpoint with the smaller residual and `a` the other end
/// of the bracket. `c` is the previous value of `b` and `d` the one before.
#[derive(Debug, Clone, Copy)]
struct AlgorithmState {
    a: f64,
    b: f64,
    c: f64,
    d: Option<f64>,
    fa: f64,
    fb: f64,
    fc: f64,
    /// Whether the last step was a bisection.
    mflag: bool,
}

impl AlgorithmState {
    fn new(a: f64, fa: f64, b: f64, fb: f64) -> Self {
        let mut state = Self {
            a,
            b,
            c: a,
            d: None,
            fa,
            fb,
            fc: fa,
            mflag: true,
        };
        state.normalize();
        state.c = state.a;
        state.fc = state.fa;
        state
    }

    /// Ensure |f(a)| >= |f(b)|
    fn normalize(&mut self) {
        if self.fa.abs() < self.fb.abs() {
            std::mem::swap(&mut self.a, &mut self.b);
            std::mem::swap(&mut self.fa, &mut self.fb);
        }
    }

    /// Interpolated candidate: inverse quadratic through `a`, `b`, `c` when
    /// the three residuals differ, secant through `a` and `b` otherwise.
    fn candidate(&self) -> (f64, Method) {
        let Self {
            a, b, c, fa, fb, fc, ..
        } = *self;

        if fa != fb && fa != fc && fb != fc {
            let s = a * fb * fc / ((fa - fb) * (fa - fc))
                + b * fa * fc / ((fb - fa) * (fb - fc))
                + c * fa * fb / ((fc - fa) * (fc - fb));
            (s, Method::InverseQuadratic)
        } else {
            (b - fb * (b - a) / (fb - fa), Method::Secant)
        }
    }

    /// Whether candidate `s` must be replaced by the bracket midpoint.
    fn needs_bisection(&self, s: f64, tolerance: f64) -> bool {
        // s must lie between (3a + b) / 4 and b; a NaN candidate fails too.
        // Weighted form so brackets near f64::MAX do not overflow.
        let corridor_end = 0.75 * self.a + 0.25 * self.b;
        let (lo, hi) = if corridor_end < self.b {
            (corridor_end, self.b)
        } else {
            (self.b, corridor_end)
        };
        if !(lo <= s && s <= hi) {
            return true;
        }

        // Size of the previous step: |b - c| after a bisection, |c - d| otherwise.
        let previous = if self.mflag {
            Some((self.b - self.c).abs())
        } else {
            self.d.map(|d| (self.c - d).abs())
        };

        match previous {
            Some(step) => (s - self.b).abs() >= step / 2.0 || step < tolerance,
            None => true,
        }
    }

    /// Chooses the point to evaluate this iteration and updates `mflag`.
    fn next_point(&mut self, tolerance: f64) -> (f64, Method) {
        let (s, method) = self.candidate();
        if self.needs_bisection(s, tolerance) {
            self.mflag = true;
            (midpoint(self.a, self.b), Method::Bisection)
        } else {
            self.mflag = false;
            (s, method)
        }
    }

    fn record(&self, iteration: u32, method: Method, s: f64, fs: f64) -> IterationStep {
        IterationStep {
            iteration,
            a: self.a,
            b: self.b,
            c: self.c,
            fa: self.fa,
            fb: self.fb,
            fc: self.fc,
            method,
            new_point: s,
            error: fs.abs(),
        }
    }

    /// Shifts the history and replaces one bracket endpoint with `s`.
    fn advance(&mut self, s: f64, fs: f64) {
        self.d = Some(self.c);
        self.c = self.b;
        self.fc = self.fb;

        if opposite_signs(self.fa, fs) {
            self.b = s;
            self.fb = fs;
        } else {
            self.a = s;
            self.fa = fs;
        }

        self.normalize();
    }

    fn converged(&self, tolerance: f64) -> bool {
        self.fb.abs() < tolerance || (self.b - self.a).abs() < tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{EvaluationError, Fallible};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    fn cubic(x: f64) -> f64 {
        x * x * x - 2.0 * x - 5.0
    }

    fn state(
        a: (f64, f64),
        b: (f64, f64),
        c: (f64, f64),
        d: Option<f64>,
        mflag: bool,
    ) -> AlgorithmState {
        AlgorithmState {
            a: a.0,
            fa: a.1,
            b: b.0,
            fb: b.1,
            c: c.0,
            fc: c.1,
            d,
            mflag,
        }
    }

    fn assert_trace_invariants(result: &BrentResult, max_iterations: u32) {
        let steps = result.steps();
        assert_eq!(steps.len() as u32, result.iterations);
        assert!(result.iterations <= max_iterations);

        for (i, step) in steps.iter().enumerate() {
            assert_eq!(step.iteration as usize, i + 1);
            assert!(step.fa * step.fb <= 0.0, "sign invariant broken at {step:?}");
            assert!(step.fb.abs() <= step.fa.abs(), "b is not the best estimate at {step:?}");
        }
        for pair in steps.windows(2) {
            assert!(pair[1].width() <= pair[0].width(), "bracket grew: {pair:?}");
        }
    }

    // ============ Concrete scenarios ============

    #[test]
    fn test_cubic() {
        let result = brent(&cubic, 1.0, 3.0, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.root, 2.094_551_481_542_327, epsilon = 1e-9);
        assert!(result.residual.abs() < 1e-10);
        assert_trace_invariants(&result, 100);

        // Interpolation takes over once the bracket is tight.
        let counts = result.trace.method_counts();
        assert!(counts.inverse_quadratic > 0);
        assert_ne!(result.trace.last().unwrap().method, Method::Bisection);
    }

    #[test]
    fn test_square_exact_root() {
        let f = |x: f64| x * x - 4.0;

        let result = brent(&f, 0.0, 3.0, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.root, 2.0, epsilon = 1e-10);
        assert!(result.iterations <= 10);
    }

    #[test]
    fn test_cos_fixed_point() {
        let f = |x: f64| x.cos() - x;

        let result = brent(&f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.root, 0.739_085_133_215_160_6, epsilon = 1e-9);
        assert_trace_invariants(&result, 100);
    }

    #[test]
    fn test_invalid_bracket() {
        let evaluations = Cell::new(0);
        let f = |x: f64| {
            evaluations.set(evaluations.get() + 1);
            x * x - 4.0
        };

        let err = brent(&f, 2.5, 3.0, &SolverConfig::default()).unwrap_err();
        assert!(err.is_invalid_bracket());
        assert_eq!(evaluations.get(), 2);

        let err = brent(&|x: f64| x * x - 4.0, 3.0, 5.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            MathError::InvalidBracket { a, b, fa, fb } if a == 3.0 && b == 5.0 && fa == 5.0 && fb == 21.0
        ));
    }

    #[test]
    fn test_bracket_touching_root_is_valid() {
        // f(1) = -3 and f(2) = 0: a zero residual satisfies f(a) * f(b) <= 0.
        let f = |x: f64| x * x - 4.0;

        let result = brent(&f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.root, 2.0);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_iteration_cap_is_not_an_error() {
        let config = SolverConfig::default().with_max_iterations(1);

        let result = brent(&cubic, 1.0, 3.0, &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.steps().len(), 1);
        // The single secant step lands at 17/11, which becomes the best estimate.
        assert_relative_eq!(result.root, 17.0 / 11.0, epsilon = 1e-12);
        assert_relative_eq!(result.residual, cubic(17.0 / 11.0), epsilon = 1e-12);
    }

    // ============ Bracket handling ============

    #[test]
    fn test_endpoint_order_is_irrelevant() {
        let f = |x: f64| x * x - 4.0;
        let config = SolverConfig::default();

        let forward = brent(&f, 0.0, 3.0, &config).unwrap();
        let backward = brent(&f, 3.0, 0.0, &config).unwrap();

        assert_relative_eq!(forward.root, backward.root, epsilon = 1e-12);
        assert_eq!(forward.iterations, backward.iterations);
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x * x - 4.0;

        let result = brent(&f, 2.0, 5.0, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_eq!(result.root, 2.0);
        assert_eq!(result.iterations, 1);
    }

    #[test]
    fn test_bracket_near_f64_max() {
        let f = |x: f64| x - 1.5e308;

        let result = brent(&f, 1e308, 1.7e308, &SolverConfig::default()).unwrap();

        assert!(result.converged);
        assert_relative_eq!(result.root, 1.5e308, max_relative = 1e-12);
        for step in result.steps() {
            assert!(step.new_point.is_finite(), "left the bracket at {step:?}");
        }
    }

    #[test]
    fn test_midpoint_does_not_overflow() {
        assert_eq!(midpoint(0.0, 1.0), 0.5);
        assert_eq!(midpoint(f64::MAX, f64::MAX), f64::MAX);
        assert_eq!(midpoint(-f64::MAX, f64::MAX), 0.0);
    }

    #[test]
    fn test_tiny_residuals_do_not_underflow_sign_check() {
        // f(a) * f(b) underflows to zero here although the signs agree.
        let f = |x: f64| 1e-200 * (x + 10.0);
        assert!(brent(&f, 1.0, 2.0, &SolverConfig::default())
            .unwrap_err()
            .is_invalid_bracket());
    }

    #[test]
    fn test_invalid_inputs_fail_before_evaluation() {
        let evaluations = Cell::new(0);
        let f = |x: f64| {
            evaluations.set(evaluations.get() + 1);
            x
        };

        let bad_tolerance = SolverConfig::default().with_tolerance(-1.0);
        assert!(matches!(
            brent(&f, -1.0, 1.0, &bad_tolerance),
            Err(MathError::InvalidInput { .. })
        ));

        let no_iterations = SolverConfig::default().with_max_iterations(0);
        assert!(brent(&f, -1.0, 1.0, &no_iterations).is_err());

        assert!(brent(&f, f64::NAN, 1.0, &SolverConfig::default()).is_err());
        assert!(brent(&f, -1.0, f64::INFINITY, &SolverConfig::default()).is_err());

        assert_eq!(evaluations.get(), 0);
    }

    // ============ Evaluation failures ============

    #[test]
    fn test_endpoint_evaluation_error() {
        let f = |x: f64| x.ln();

        let err = brent(&f, 0.0, 2.0, &SolverConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            MathError::Evaluation(EvaluationError::NonFinite { x, .. }) if x == 0.0
        ));
    }

    #[test]
    fn test_interior_evaluation_error_propagates() {
        // The first step evaluates 17/11 ~ 1.545.
        let f = Fallible(|x: f64| {
            if (1.5..1.6).contains(&x) {
                Err(EvaluationError::undefined(x, "pole"))
            } else {
                Ok(cubic(x))
            }
        });

        let err = brent(&f, 1.0, 3.0, &SolverConfig::default()).unwrap_err();
        match err {
            MathError::Evaluation(EvaluationError::Undefined { x, reason }) => {
                assert_relative_eq!(x, 17.0 / 11.0, epsilon = 1e-12);
                assert_eq!(reason, "pole");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_one_evaluation_per_iteration() {
        let evaluations = Cell::new(0u32);
        let f = |x: f64| {
            evaluations.set(evaluations.get() + 1);
            x.cos() - x
        };

        let result = brent(&f, 0.0, 1.0, &SolverConfig::default()).unwrap();
        assert_eq!(evaluations.get(), result.iterations + 2);
    }

    // ============ Invariants ============

    #[test]
    fn test_invariants_across_functions() {
        let functions: Vec<(Box<dyn Fn(f64) -> f64>, f64, f64)> = vec![
            (Box::new(cubic), 1.0, 3.0),
            (Box::new(|x: f64| x * x - 4.0), 3.0, 0.0),
            (Box::new(|x: f64| x.exp() - 2.0), 0.0, 1.0),
            (Box::new(|x: f64| x * x * x - x - 1.0), 1.0, 2.0),
            (Box::new(|x: f64| (x - 1.0).powi(3)), 0.0, 3.0),
            (Box::new(|x: f64| x.sin()), 3.0, 4.0),
            (Box::new(|x: f64| x.atan() - 0.5), -10.0, 50.0),
        ];
        let config = SolverConfig::default();

        for (f, a, b) in &functions {
            let result = brent(f, *a, *b, &config).unwrap();
            assert!(result.converged, "no convergence on [{a}, {b}]");
            assert!(f(result.root).abs() < 1e-8);
            assert_trace_invariants(&result, config.max_iterations);
        }
    }

    #[test]
    fn test_trace_bounded_by_cap() {
        for cap in 1..6 {
            let config = SolverConfig::default()
                .with_tolerance(1e-300)
                .with_max_iterations(cap);
            let result = brent(&|x: f64| (x - 1.0).powi(3), 0.0, 3.0, &config).unwrap();

            assert!(result.iterations <= cap);
            assert_eq!(result.steps().len() as u32, result.iterations);
        }
    }

    #[test]
    fn test_steps_record_start_of_iteration() {
        let result = brent(&cubic, 1.0, 3.0, &SolverConfig::default()).unwrap();
        let first = result.steps()[0];

        // |f(1)| < |f(3)|, so the endpoints are swapped before iterating.
        assert_eq!((first.a, first.b, first.c), (3.0, 1.0, 3.0));
        assert_eq!((first.fa, first.fb, first.fc), (16.0, -6.0, 16.0));
        assert_eq!(first.method, Method::Secant);
        assert_relative_eq!(first.error, cubic(first.new_point).abs());
    }

    // ============ Method selection ============

    #[test]
    fn test_inverse_quadratic_when_residuals_distinct() {
        let st = state((0.0, -2.0), (1.0, 1.0), (2.0, 4.0), None, true);
        let (s, method) = st.candidate();
        assert_eq!(method, Method::InverseQuadratic);
        assert_relative_eq!(s, 2.0 / 3.0, epsilon = 1e-12);

        let mut st = st;
        assert_eq!(st.next_point(1e-10).1, Method::InverseQuadratic);
        assert!(!st.mflag);
    }

    #[test]
    fn test_secant_when_fa_equals_fc() {
        let mut st = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), None, true);
        let (s, method) = st.next_point(1e-10);
        assert_eq!(method, Method::Secant);
        assert_relative_eq!(s, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_secant_when_fb_equals_fc() {
        let mut st = state((0.0, -2.0), (1.0, 1.0), (3.0, 1.0), None, true);
        let (_, method) = st.next_point(1e-10);
        assert_eq!(method, Method::Secant);
    }

    #[test]
    fn test_bisection_when_outside_corridor() {
        // Secant extrapolates to s = 2, beyond b.
        let mut st = state((0.0, 2.0), (1.0, 1.0), (10.0, 2.0), None, true);
        assert_eq!(st.candidate(), (2.0, Method::Secant));

        let (s, method) = st.next_point(1e-10);
        assert_eq!(method, Method::Bisection);
        assert_eq!(s, 0.5);
        assert!(st.mflag);
    }

    #[test]
    fn test_bisection_when_candidate_is_nan() {
        let mut st = state((0.0, 0.0), (1.0, 0.0), (0.0, 0.0), None, true);
        assert!(st.candidate().0.is_nan());
        assert_eq!(st.next_point(1e-10), (0.5, Method::Bisection));
    }

    #[test]
    fn test_corridor_is_order_independent() {
        // Same geometry mirrored: a to the right of b.
        let mut left = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), None, true);
        let mut right = state((2.0, -2.0), (1.0, 1.0), (2.0, -2.0), None, true);

        let (sl, ml) = left.next_point(1e-10);
        let (sr, mr) = right.next_point(1e-10);

        assert_eq!(ml, Method::Secant);
        assert_eq!(mr, Method::Secant);
        assert_relative_eq!(sl - 1.0, 1.0 - sr, epsilon = 1e-12);
    }

    #[test]
    fn test_bisection_when_step_too_large_after_bisection() {
        // s = 0.5 and |s - b| = |b - c| / 2.
        let mut st = state((0.0, -1.0), (1.0, 1.0), (0.0, -1.0), None, true);
        assert_eq!(st.candidate().0, 0.5);
        assert_eq!(st.next_point(1e-10).1, Method::Bisection);
    }

    #[test]
    fn test_bisection_when_step_too_large_after_interpolation() {
        // s = 2/3, |s - b| = 1/3.
        let mut accepted = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), Some(-1.0), false);
        assert_eq!(accepted.next_point(1e-10).1, Method::Secant);

        let mut rejected = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), Some(0.5), false);
        assert_eq!(rejected.next_point(1e-10).1, Method::Bisection);
    }

    #[test]
    fn test_bisection_when_last_bisection_step_below_tolerance() {
        // |b - c| = 2, and |s - b| = 1/3 is small enough to pass the step check.
        let mut loose = state((0.0, -2.0), (1.0, 1.0), (3.0, 1.0), None, true);
        assert_eq!(loose.next_point(1e-10).1, Method::Secant);

        let mut tight = state((0.0, -2.0), (1.0, 1.0), (3.0, 1.0), None, true);
        assert_eq!(tight.next_point(10.0).1, Method::Bisection);
    }

    #[test]
    fn test_bisection_when_last_interpolation_step_below_tolerance() {
        // |c - d| = 1, and |s - b| = 1/3 is small enough to pass the step check.
        let mut loose = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), Some(-1.0), false);
        assert_eq!(loose.next_point(1e-10).1, Method::Secant);

        let mut tight = state((0.0, -2.0), (1.0, 1.0), (0.0, -2.0), Some(-1.0), false);
        assert_eq!(tight.next_point(2.0).1, Method::Bisection);
    }

    #[test]
    fn test_normalize_keeps_best_estimate_in_b() {
        let st = AlgorithmState::new(1.0, -6.0, 3.0, 16.0);
        assert_eq!((st.a, st.b), (3.0, 1.0));
        assert_eq!((st.c, st.fc), (3.0, 16.0));
        assert!(st.mflag);
        assert!(st.d.is_none());
    }
}
