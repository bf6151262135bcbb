//! Presets command implementation.
//!
//! Lists the predefined functions and their brackets.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use rootscope_math::functions::Preset;

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::output::{print_header, print_output};

/// A preset, formatted for display.
#[derive(Debug, Serialize, Tabled)]
struct PresetRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "f(x)")]
    formula: &'static str,
    #[tabled(rename = "a")]
    a: f64,
    #[tabled(rename = "b")]
    b: f64,
}

impl From<Preset> for PresetRow {
    fn from(preset: Preset) -> Self {
        let (a, b) = preset.bracket();
        Self {
            name: preset.slug(),
            formula: preset.label(),
            a,
            b,
        }
    }
}

/// Execute the presets command.
pub fn execute(ctx: &Context) -> Result<()> {
    let rows: Vec<PresetRow> = Preset::ALL.into_iter().map(PresetRow::from).collect();

    match ctx.format {
        OutputFormat::Table => {
            print_header("Preset Functions");
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => {
            for row in &rows {
                println!("{}", row.name);
            }
        }
        OutputFormat::Json | OutputFormat::Csv => print_output(&rows, ctx.format)?,
    }

    Ok(())
}
