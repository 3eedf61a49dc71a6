//! `velo config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::core::config::{CONFIG_ENV, KEYS};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Unset (remove) a configuration value
    Unset(UnsetArgs),

    /// Show the path of the configuration file
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g., currency_symbol)
    pub key: String,

    /// Value to set
    pub value: String,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Set(args) => run_set(args),
        ConfigCommands::Unset(args) => run_unset(args),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        check_key(key)?;
        return match config.get(key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in KEYS {
        match config.get(key) {
            Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
            None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command-line flags (--format, --catalog)");
    println!("  2. Environment variables (VELO_FORMAT, VELO_CURRENCY, VELO_CATALOG)");
    println!("  3. Config file ({} or ~/.config/velo/config.yaml)", CONFIG_ENV);
    Ok(())
}

fn run_set(args: SetArgs) -> Result<()> {
    check_key(&args.key)?;
    if args.key == "default_format" && args.value.parse::<OutputFormat>().is_err() {
        return Err(miette::miette!(
            help = "Valid formats: auto, yaml, tsv, json, csv, md, id, short-id",
            "'{}' is not an output format",
            args.value
        ));
    }

    let config_path = config_path()?;
    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );
    write_mapping(&config_path, config_map)?;

    tracing::debug!(path = %config_path.display(), key = %args.key, "config value set");
    println!(
        "{} Set {} {} {}",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow()
    );
    Ok(())
}

fn run_unset(args: UnsetArgs) -> Result<()> {
    check_key(&args.key)?;
    let config_path = config_path()?;

    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let key = serde_yml::Value::String(args.key.clone());
    if config_map.remove(&key).is_none() {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }
    write_mapping(&config_path, config_map)?;

    println!("{} Removed {}", style("✓").green(), style(&args.key).cyan());
    Ok(())
}

fn run_path() -> Result<()> {
    let path = config_path()?;
    println!("{}", path.display());
    if path.exists() {
        println!("  {}", style("(exists)").green());
    } else {
        println!("  {}", style("(not created)").dim());
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'velo config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn check_key(key: &str) -> Result<()> {
    if Config::is_valid_key(key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "Run `velo config keys` to list valid keys",
            "Unknown config key '{}'",
            key
        ))
    }
}

fn config_path() -> Result<PathBuf> {
    Config::global_config_path()
        .ok_or_else(|| miette::miette!("Could not determine config directory"))
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content).into_diagnostic()? {
        serde_yml::Value::Mapping(map) => Ok(map),
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        _ => Err(miette::miette!(
            "Config file is not a key/value mapping: {}",
            path.display()
        )),
    }
}

fn write_mapping(path: &Path, map: serde_yml::Mapping) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(map)).into_diagnostic()?;
    fs::write(path, yaml).into_diagnostic()?;
    Ok(())
}
