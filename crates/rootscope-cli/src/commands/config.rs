//! Config command implementation.
//!
//! Manages the stored defaults used by the other commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rootscope_math::solvers::{SolverConfig, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};

use crate::cli::OutputFormat;
use crate::commands::Context;
use crate::error::{CliError, CliResult};
use crate::output::{print_header, print_info, print_success, print_warning, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List available configuration keys
    List,

    /// Reset configuration to defaults
    Reset(ResetArgs),

    /// Show configuration file location
    Path,
}

/// Arguments for get subcommand.
#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

/// Arguments for set subcommand.
#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value
    pub value: String,
}

/// Arguments for reset subcommand.
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Reset all settings (not just one)
    #[arg(long)]
    pub all: bool,

    /// Specific key to reset (optional)
    pub key: Option<String>,
}

/// CLI configuration keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// Default output format
    DefaultFormat,
    /// Default solver tolerance
    Tolerance,
    /// Default iteration cap
    MaxIterations,
    /// Decimal places for printed values
    DecimalPrecision,
}

impl ConfigKey {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "default_format" | "format" => Some(Self::DefaultFormat),
            "tolerance" | "tol" => Some(Self::Tolerance),
            "max_iterations" | "max-iterations" => Some(Self::MaxIterations),
            "decimal_precision" | "precision" => Some(Self::DecimalPrecision),
            _ => None,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::DefaultFormat => "default_format",
            Self::Tolerance => "tolerance",
            Self::MaxIterations => "max_iterations",
            Self::DecimalPrecision => "decimal_precision",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::DefaultFormat => "Default output format (table, json, csv, minimal)",
            Self::Tolerance => "Convergence tolerance on |f(b)| and bracket width",
            Self::MaxIterations => "Iteration cap for a solve (at least 1)",
            Self::DecimalPrecision => "Number of decimal places for output (2-16)",
        }
    }

    fn default_value(self) -> String {
        match self {
            Self::DefaultFormat => "table".to_string(),
            Self::Tolerance => format!("{DEFAULT_TOLERANCE:e}"),
            Self::MaxIterations => DEFAULT_MAX_ITERATIONS.to_string(),
            Self::DecimalPrecision => "10".to_string(),
        }
    }

    fn all() -> &'static [Self] {
        &[
            Self::DefaultFormat,
            Self::Tolerance,
            Self::MaxIterations,
            Self::DecimalPrecision,
        ]
    }
}

/// Stored configuration values, keyed by [`ConfigKey::as_str`].
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Config {
    #[serde(flatten)]
    values: HashMap<String, String>,
}

impl Config {
    /// Loads the file at `path`, or an empty configuration if it does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Like [`Config::load`], but an unreadable file yields the defaults and a
    /// warning so that `config reset` can still repair it.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            print_warning(&format!(
                "Ignoring config file {}: {err}. Run `rootscope config reset --all` to repair it.",
                path.display()
            ));
            Self::default()
        })
    }

    fn save(&self, path: &Path) -> CliResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn get(&self, key: ConfigKey) -> Option<&String> {
        self.values.get(key.as_str())
    }

    fn get_or_default(&self, key: ConfigKey) -> String {
        self.get(key).cloned().unwrap_or_else(|| key.default_value())
    }

    fn set(&mut self, key: ConfigKey, value: String) {
        self.values.insert(key.as_str().to_string(), value);
    }

    fn remove(&mut self, key: ConfigKey) {
        self.values.remove(key.as_str());
    }

    /// Solver settings, with library defaults for anything not stored.
    pub fn solver_config(&self) -> CliResult<SolverConfig> {
        let mut config = SolverConfig::default();
        if let Some(value) = self.get(ConfigKey::Tolerance) {
            config.tolerance = parse_tolerance(value)?;
        }
        if let Some(value) = self.get(ConfigKey::MaxIterations) {
            config.max_iterations = parse_max_iterations(value)?;
        }
        Ok(config)
    }

    /// Stored output format, if any.
    pub fn format(&self) -> CliResult<Option<OutputFormat>> {
        self.get(ConfigKey::DefaultFormat)
            .map(|value| parse_format(value))
            .transpose()
    }

    /// Decimal places for printed values.
    pub fn precision(&self) -> CliResult<usize> {
        parse_precision(&self.get_or_default(ConfigKey::DecimalPrecision))
    }
}

/// Per-user config file location.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(home.join("rootscope").join("config.json"))
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => execute_show(ctx),
        ConfigCommand::Get(get_args) => execute_get(get_args, ctx),
        ConfigCommand::Set(set_args) => execute_set(set_args, ctx),
        ConfigCommand::List => execute_list(ctx),
        ConfigCommand::Reset(reset_args) => execute_reset(reset_args, ctx),
        ConfigCommand::Path => execute_path(ctx),
    }
}

/// Show current configuration.
fn execute_show(ctx: &Context) -> Result<()> {
    let config = &ctx.config;

    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| KeyValue::new(key.as_str(), config.get_or_default(*key)))
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            crate::output::print_output(&results, ctx.format)?;
        }
        OutputFormat::Json => {
            let output: HashMap<&str, String> = ConfigKey::all()
                .iter()
                .map(|key| (key.as_str(), config.get_or_default(*key)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            crate::output::print_output(&results, ctx.format)?;
        }
        OutputFormat::Minimal => {
            for kv in &results {
                println!("{}={}", kv.key, kv.value);
            }
        }
    }

    Ok(())
}

/// Get a configuration value.
fn execute_get(args: GetArgs, ctx: &Context) -> Result<()> {
    let key = ConfigKey::from_str(&args.key).ok_or(CliError::UnknownConfigKey(args.key))?;
    let value = ctx.config.get_or_default(key);

    match ctx.format {
        OutputFormat::Table | OutputFormat::Csv => {
            println!("{}: {}", key.as_str(), value);
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "key": key.as_str(),
                "value": value
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Minimal => {
            println!("{}", value);
        }
    }

    Ok(())
}

/// Set a configuration value.
fn execute_set(args: SetArgs, ctx: &Context) -> Result<()> {
    let key = ConfigKey::from_str(&args.key).ok_or(CliError::UnknownConfigKey(args.key))?;

    validate_config_value(key, &args.value)?;

    let mut config = ctx.config.clone();
    config.set(key, args.value.clone());
    config.save(&ctx.config_path)?;
    tracing::debug!(path = %ctx.config_path.display(), key = key.as_str(), "saved configuration");

    if !ctx.quiet {
        print_success(&format!("Set {} = {}", key.as_str(), args.value));
    }
    Ok(())
}

/// List available configuration keys.
fn execute_list(ctx: &Context) -> Result<()> {
    let results: Vec<KeyValue> = ConfigKey::all()
        .iter()
        .map(|key| {
            KeyValue::new(
                key.as_str(),
                format!("{} (default: {})", key.description(), key.default_value()),
            )
        })
        .collect();

    match ctx.format {
        OutputFormat::Table => {
            print_header("Available Configuration Keys");
            crate::output::print_output(&results, ctx.format)?;
        }
        OutputFormat::Json => {
            let output: Vec<_> = ConfigKey::all()
                .iter()
                .map(|key| {
                    serde_json::json!({
                        "key": key.as_str(),
                        "description": key.description(),
                        "default": key.default_value()
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Csv => {
            crate::output::print_output(&results, ctx.format)?;
        }
        OutputFormat::Minimal => {
            for key in ConfigKey::all() {
                println!("{}", key.as_str());
            }
        }
    }

    Ok(())
}

/// Reset configuration.
fn execute_reset(args: ResetArgs, ctx: &Context) -> Result<()> {
    if args.all {
        // Overwrite without reading, so a corrupt file is replaced too.
        Config::default().save(&ctx.config_path)?;
        if !ctx.quiet {
            print_success("Reset all configuration to defaults");
        }
    } else if let Some(key_str) = args.key {
        let key = ConfigKey::from_str(&key_str).ok_or(CliError::UnknownConfigKey(key_str))?;
        let mut config = ctx.config.clone();
        config.remove(key);
        config.save(&ctx.config_path)?;
        if !ctx.quiet {
            print_success(&format!(
                "Reset {} to default ({})",
                key.as_str(),
                key.default_value()
            ));
        }
    } else {
        print_warning("Use --all to reset all settings, or specify a key to reset");
    }

    Ok(())
}

/// Show configuration file path.
fn execute_path(ctx: &Context) -> Result<()> {
    let path = &ctx.config_path;
    if ctx.format == OutputFormat::Minimal {
        println!("{}", path.display());
        return Ok(());
    }

    print_info(&format!("Config file: {}", path.display()));
    if path.exists() {
        print_info("Status: exists");
    } else {
        print_info("Status: not created yet (using defaults)");
    }
    Ok(())
}

/// Validate a configuration value.
fn validate_config_value(key: ConfigKey, value: &str) -> CliResult<()> {
    match key {
        ConfigKey::DefaultFormat => parse_format(value).map(|_| ()),
        ConfigKey::Tolerance => parse_tolerance(value).map(|_| ()),
        ConfigKey::MaxIterations => parse_max_iterations(value).map(|_| ()),
        ConfigKey::DecimalPrecision => parse_precision(value).map(|_| ()),
    }
}

fn parse_format(value: &str) -> CliResult<OutputFormat> {
    match value.to_lowercase().as_str() {
        "table" => Ok(OutputFormat::Table),
        "json" => Ok(OutputFormat::Json),
        "csv" => Ok(OutputFormat::Csv),
        "minimal" => Ok(OutputFormat::Minimal),
        _ => Err(CliError::Config(format!(
            "Invalid format: {}. Use table, json, csv, or minimal.",
            value
        ))),
    }
}

fn parse_tolerance(value: &str) -> CliResult<f64> {
    let tolerance: f64 = value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid tolerance: {}. Must be a number.", value)))?;
    super::validate_tolerance(tolerance)
}

fn parse_max_iterations(value: &str) -> CliResult<u32> {
    let max_iterations: u32 = value.parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid max_iterations: {}. Must be a whole number.",
            value
        ))
    })?;
    super::validate_max_iterations(max_iterations)
}

fn parse_precision(value: &str) -> CliResult<usize> {
    let precision: usize = value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid precision: {}. Must be a number.", value)))?;
    if !(2..=16).contains(&precision) {
        return Err(CliError::Config(format!(
            "Invalid precision: {}. Must be between 2 and 16.",
            precision
        )));
    }
    Ok(precision)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();

        assert_eq!(config.solver_config().unwrap(), SolverConfig::default());
        assert_eq!(config.format().unwrap(), None);
        assert_eq!(config.precision().unwrap(), 10);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set(ConfigKey::Tolerance, "1e-6".to_string());
        config.set(ConfigKey::MaxIterations, "25".to_string());
        config.set(ConfigKey::DefaultFormat, "JSON".to_string());
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        let solver = loaded.solver_config().unwrap();
        assert_eq!(solver.tolerance, 1e-6);
        assert_eq!(solver.max_iterations, 25);
        assert_eq!(loaded.format().unwrap(), Some(OutputFormat::Json));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"max_iterations": 50}"#).unwrap();

        assert!(matches!(Config::load(&path), Err(CliError::Serialization(_))));

        let config = Config::load_or_default(&path);
        assert_eq!(config.solver_config().unwrap(), SolverConfig::default());
        assert_eq!(config.format().unwrap(), None);
    }

    #[test]
    fn test_hand_edited_values_are_checked() {
        let mut config = Config::default();
        config.set(ConfigKey::Tolerance, "-1".to_string());
        assert!(config.solver_config().is_err());

        config.remove(ConfigKey::Tolerance);
        config.set(ConfigKey::MaxIterations, "0".to_string());
        assert!(config.solver_config().is_err());
    }

    #[test]
    fn test_validate_config_value() {
        assert!(validate_config_value(ConfigKey::DefaultFormat, "csv").is_ok());
        assert!(validate_config_value(ConfigKey::DefaultFormat, "xml").is_err());
        assert!(validate_config_value(ConfigKey::Tolerance, "1e-12").is_ok());
        assert!(validate_config_value(ConfigKey::Tolerance, "0").is_err());
        assert!(validate_config_value(ConfigKey::Tolerance, "abc").is_err());
        assert!(validate_config_value(ConfigKey::MaxIterations, "-3").is_err());
        assert!(validate_config_value(ConfigKey::DecimalPrecision, "17").is_err());
        assert!(validate_config_value(ConfigKey::DecimalPrecision, "6").is_ok());
    }

    #[test]
    fn test_key_aliases() {
        assert_eq!(ConfigKey::from_str("FORMAT"), Some(ConfigKey::DefaultFormat));
        assert_eq!(ConfigKey::from_str("tol"), Some(ConfigKey::Tolerance));
        assert_eq!(ConfigKey::from_str("precision"), Some(ConfigKey::DecimalPrecision));
        assert_eq!(ConfigKey::from_str("currency"), None);
    }
}
