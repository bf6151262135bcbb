//! Solve command implementation.
//!
//! Runs Brent's method on a preset function and reports the root and trace.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use rootscope_math::functions::Preset;
use rootscope_math::solvers::{
    BrentResult, IterationStep, MethodCounts, RootFinder, SolverConfig,
};

use crate::cli::OutputFormat;
use crate::commands::{resolve_bracket, validate_max_iterations, validate_tolerance, Context};
use crate::output::{
    format_float, format_sci, print_csv, print_header, print_output, print_single, print_warning,
    KeyValue,
};

/// Arguments for the solve command.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// Preset function, by name or formula (see `rootscope presets`)
    pub function: Preset,

    /// One end of the bracket. Defaults to the preset's bracket.
    #[arg(short, allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// Other end of the bracket. Defaults to the preset's bracket.
    #[arg(short, allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Convergence tolerance. Defaults to the stored tolerance.
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    /// Iteration cap. Defaults to the stored max_iterations.
    #[arg(short = 'n', long)]
    pub max_iterations: Option<u32>,

    /// Print every iteration of the trace
    #[arg(short, long)]
    pub steps: bool,
}

/// Machine-readable report of a solve.
#[derive(Debug, Serialize)]
struct SolveReport<'a> {
    function: &'static str,
    preset: Preset,
    bracket: [f64; 2],
    config: SolverConfig,
    method_counts: MethodCounts,
    #[serde(flatten)]
    result: &'a BrentResult,
}

/// One row of the iteration table.
#[derive(Debug, Serialize, Tabled)]
struct StepRow {
    #[tabled(rename = "#")]
    iteration: u32,
    #[tabled(rename = "a")]
    a: String,
    #[tabled(rename = "b")]
    b: String,
    #[tabled(rename = "c")]
    c: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "New point")]
    new_point: String,
    #[tabled(rename = "|f(s)|")]
    error: String,
}

impl StepRow {
    fn new(step: &IterationStep, precision: usize) -> Self {
        Self {
            iteration: step.iteration,
            a: format_float(step.a, precision),
            b: format_float(step.b, precision),
            c: format_float(step.c, precision),
            method: step.method.to_string(),
            new_point: format_float(step.new_point, precision),
            error: format_sci(step.error),
        }
    }
}

/// Execute the solve command.
pub fn execute(args: SolveArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.solver_config()?;
    if let Some(tolerance) = args.tolerance {
        config.tolerance = validate_tolerance(tolerance)?;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.max_iterations = validate_max_iterations(max_iterations)?;
    }
    let (a, b) = resolve_bracket(args.function, args.a, args.b)?;
    let precision = ctx.config.precision()?;

    tracing::info!(
        function = args.function.slug(),
        a,
        b,
        tolerance = config.tolerance,
        max_iterations = config.max_iterations,
        "solving"
    );

    let result = RootFinder::new(config).solve(&args.function, a, b)?;

    tracing::info!(
        root = result.root,
        iterations = result.iterations,
        converged = result.converged,
        "solve finished"
    );

    match ctx.format {
        OutputFormat::Table => {
            print_header(&format!("Brent's Method: f(x) = {}", args.function));
            print_output(&summary(args.function, (a, b), &config, &result, precision), ctx.format)?;

            if args.steps {
                print_header("Iterations");
                let rows: Vec<StepRow> = result
                    .steps()
                    .iter()
                    .map(|step| StepRow::new(step, precision))
                    .collect();
                print_output(&rows, ctx.format)?;
            }
        }
        OutputFormat::Json => {
            print_single(&SolveReport {
                function: args.function.label(),
                preset: args.function,
                bracket: [a, b],
                config,
                method_counts: result.trace.method_counts(),
                result: &result,
            })?;
        }
        OutputFormat::Csv => {
            print_csv(result.steps())?;
        }
        OutputFormat::Minimal => {
            println!("{}", format_float(result.root, precision));
        }
    }

    if !result.converged && !ctx.quiet {
        print_warning(&format!(
            "No convergence after {} iterations; best estimate {} (|f| = {}). \
             Try a looser tolerance or a higher iteration cap.",
            result.iterations,
            format_float(result.root, precision),
            format_sci(result.residual.abs())
        ));
    }

    Ok(())
}

fn summary(
    preset: Preset,
    (a, b): (f64, f64),
    config: &SolverConfig,
    result: &BrentResult,
    precision: usize,
) -> Vec<KeyValue> {
    let counts = result.trace.method_counts();
    vec![
        KeyValue::new("Function", preset.label()),
        KeyValue::new("Bracket", format!("[{}, {}]", a, b)),
        KeyValue::new("Tolerance", format_sci(config.tolerance)),
        KeyValue::new("Max Iterations", config.max_iterations.to_string()),
        KeyValue::new("", ""), // Separator
        KeyValue::from_float("Root", result.root, precision),
        KeyValue::new("f(root)", format_sci(result.residual)),
        KeyValue::new("Iterations", result.iterations.to_string()),
        KeyValue::new("Converged", if result.converged { "yes" } else { "no" }),
        KeyValue::new("Bisection Steps", counts.bisection.to_string()),
        KeyValue::new("Secant Steps", counts.secant.to_string()),
        KeyValue::new("Inverse Quadratic Steps", counts.inverse_quadratic.to_string()),
    ]
}
