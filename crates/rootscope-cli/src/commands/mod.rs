//! CLI command implementations.

pub mod config;
pub mod presets;
pub mod sample;
pub mod solve;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use sample::SampleArgs;
pub use solve::SolveArgs;

use std::path::PathBuf;

use rootscope_math::functions::Preset;

use crate::cli::{Cli, OutputFormat};
use crate::error::{CliError, CliResult};
use crate::output::print_warning;

/// Settings shared by every command.
pub struct Context {
    /// Resolved output format.
    pub format: OutputFormat,
    /// Suppress non-essential output.
    pub quiet: bool,
    /// Location of the configuration file.
    pub config_path: PathBuf,
    /// Stored configuration.
    pub config: config::Config,
}

impl Context {
    /// Resolves the config file and output format for this invocation.
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => config::default_config_path()?,
        };
        let config = config::Config::load_or_default(&config_path);
        let format = match cli.format {
            Some(format) => format,
            None => match config.format() {
                Ok(format) => format.unwrap_or_default(),
                Err(err) => {
                    print_warning(&format!("{err} Falling back to table output."));
                    OutputFormat::default()
                }
            },
        };

        Ok(Self {
            format,
            quiet: cli.quiet,
            config_path,
            config,
        })
    }
}

/// Resolves the bracket: both ends given, or the preset's own bracket.
pub fn resolve_bracket(preset: Preset, a: Option<f64>, b: Option<f64>) -> CliResult<(f64, f64)> {
    match (a, b) {
        (Some(a), Some(b)) => Ok((a, b)),
        (None, None) => Ok(preset.bracket()),
        (Some(_), None) => Err(CliError::MissingArgument("-b (the bracket needs both ends)".into())),
        (None, Some(_)) => Err(CliError::MissingArgument("-a (the bracket needs both ends)".into())),
    }
}

/// Validates a tolerance value.
pub fn validate_tolerance(tolerance: f64) -> CliResult<f64> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(CliError::InvalidTolerance(tolerance));
    }
    Ok(tolerance)
}

/// Validates an iteration cap.
pub fn validate_max_iterations(max_iterations: u32) -> CliResult<u32> {
    if max_iterations == 0 {
        return Err(CliError::InvalidMaxIterations(max_iterations));
    }
    Ok(max_iterations)
}
