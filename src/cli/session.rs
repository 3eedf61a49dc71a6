//! Per-invocation state shared by the commands: configuration, catalog and
//! the resolved output format

use miette::Result;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Catalog, Config};

pub struct Session {
    pub config: Config,
    pub catalog: Catalog,
    pub quiet: bool,
    format: OutputFormat,
}

impl Session {
    /// Load configuration, apply the global flags and open the catalog
    pub fn open(global: &GlobalOpts) -> Result<Self> {
        let config = Config::load();
        let catalog_path = global.catalog.clone().or_else(|| config.catalog.clone());
        let catalog = Catalog::open(catalog_path.as_deref())?;
        let format = resolve_format(global.format, &config);

        Ok(Self {
            config,
            catalog,
            quiet: global.quiet,
            format,
        })
    }

    /// The requested format, with `Auto` replaced by the command's default
    pub fn format_or(&self, default: OutputFormat) -> OutputFormat {
        match self.format {
            OutputFormat::Auto => default,
            f => f,
        }
    }

    pub fn currency(&self) -> &str {
        self.config.currency_symbol()
    }
}

/// The `--format` flag wins; otherwise the configured default, if it parses
fn resolve_format(flag: OutputFormat, config: &Config) -> OutputFormat {
    if flag != OutputFormat::Auto {
        return flag;
    }
    match config.default_format.as_deref() {
        None => OutputFormat::Auto,
        Some(name) => name.parse().unwrap_or_else(|_| {
            tracing::warn!(value = name, "ignoring unknown default_format");
            OutputFormat::Auto
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_format(format: &str) -> Config {
        Config {
            default_format: Some(format.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_flag_beats_config() {
        let config = config_with_format("json");
        assert_eq!(resolve_format(OutputFormat::Csv, &config), OutputFormat::Csv);
    }

    #[test]
    fn test_config_default_format() {
        let config = config_with_format("md");
        assert_eq!(resolve_format(OutputFormat::Auto, &config), OutputFormat::Md);
        let config = config_with_format("short-id");
        assert_eq!(resolve_format(OutputFormat::Auto, &config), OutputFormat::ShortId);
    }

    #[test]
    fn test_unknown_config_format_is_auto() {
        let config = config_with_format("xml");
        assert_eq!(resolve_format(OutputFormat::Auto, &config), OutputFormat::Auto);
        assert_eq!(resolve_format(OutputFormat::Auto, &Config::default()), OutputFormat::Auto);
    }
}
