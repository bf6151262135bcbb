//! Sample command implementation.
//!
//! Samples a preset function over its padded bracket, for plotting.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use rootscope_math::functions::Preset;
use rootscope_math::sampling::{sample_curve, SampleConfig, DEFAULT_PADDING, DEFAULT_SAMPLES};

use crate::cli::OutputFormat;
use crate::commands::{resolve_bracket, Context};
use crate::output::{format_float, print_csv, print_header, print_output, print_single};

/// Arguments for the sample command.
#[derive(Args, Debug)]
pub struct SampleArgs {
    /// Preset function, by name or formula (see `rootscope presets`)
    pub function: Preset,

    /// One end of the range. Defaults to the preset's bracket.
    #[arg(short, allow_negative_numbers = true)]
    pub a: Option<f64>,

    /// Other end of the range. Defaults to the preset's bracket.
    #[arg(short, allow_negative_numbers = true)]
    pub b: Option<f64>,

    /// Number of intervals; one more point than this is evaluated
    #[arg(long, default_value_t = DEFAULT_SAMPLES)]
    pub samples: usize,

    /// Padding on each side, as a fraction of the range width
    #[arg(long, default_value_t = DEFAULT_PADDING)]
    pub padding: f64,
}

/// One sampled point, formatted for display.
#[derive(Debug, Serialize, Tabled)]
struct PointRow {
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "f(x)")]
    y: String,
}

/// Execute the sample command.
pub fn execute(args: SampleArgs, ctx: &Context) -> Result<()> {
    let (a, b) = resolve_bracket(args.function, args.a, args.b)?;
    let config = SampleConfig::default()
        .with_samples(args.samples)
        .with_padding(args.padding);

    let points = sample_curve(&args.function, a, b, &config)?;
    tracing::info!(function = args.function.slug(), points = points.len(), "sampled curve");

    match ctx.format {
        OutputFormat::Table => {
            let precision = ctx.config.precision()?;
            let rows: Vec<PointRow> = points
                .iter()
                .map(|p| PointRow {
                    x: format_float(p.x, precision),
                    y: format_float(p.y, precision),
                })
                .collect();
            print_header(&format!("f(x) = {}", args.function));
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Json => print_single(&points)?,
        OutputFormat::Csv => print_csv(&points)?,
        OutputFormat::Minimal => {
            for p in &points {
                println!("{} {}", p.x, p.y);
            }
        }
    }

    Ok(())
}
