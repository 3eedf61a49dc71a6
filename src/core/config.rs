//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::money::DEFAULT_CURRENCY;

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "VELO_CONFIG";

/// Configuration keys and their descriptions
pub const KEYS: &[(&str, &str)] = &[
    (
        "default_format",
        "Default output format (yaml, json, tsv, csv, md, id)",
    ),
    ("currency_symbol", "Symbol used when printing amounts"),
    ("catalog", "Catalog file to load instead of the sample data"),
];

/// Velo configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Currency symbol for printed amounts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_symbol: Option<String>,

    /// Catalog file to load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    ///
    /// Command-line flags are applied by the caller on top of the result.
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/velo/config.yaml)
        if let Some(path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&path) {
                config.merge(global);
            }
        }

        // 3. Environment variables
        config.merge(Self::from_env(|name| std::env::var(name).ok()));

        config
    }

    /// Path of the global config file (`VELO_CONFIG` overrides it)
    pub fn global_config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }
        directories::ProjectDirs::from("", "", "velo")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config file");
                return None;
            }
        };
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                None
            }
        }
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            default_format: var("VELO_FORMAT"),
            currency_symbol: var("VELO_CURRENCY"),
            catalog: var("VELO_CATALOG").map(PathBuf::from),
        }
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.currency_symbol.is_some() {
            self.currency_symbol = other.currency_symbol;
        }
        if other.catalog.is_some() {
            self.catalog = other.catalog;
        }
    }

    pub fn currency_symbol(&self) -> &str {
        self.currency_symbol.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    /// Value of a key as text, if set
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "default_format" => self.default_format.clone(),
            "currency_symbol" => self.currency_symbol.clone(),
            "catalog" => self.catalog.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }

    pub fn is_valid_key(key: &str) -> bool {
        KEYS.iter().any(|(k, _)| *k == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            default_format: Some("yaml".to_string()),
            currency_symbol: Some("€".to_string()),
            catalog: None,
        };
        base.merge(Config {
            default_format: Some("json".to_string()),
            ..Default::default()
        });
        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.currency_symbol(), "€");
    }

    #[test]
    fn test_env_layer() {
        let env = Config::from_env(|name| match name {
            "VELO_CURRENCY" => Some("£".to_string()),
            "VELO_CATALOG" => Some("/tmp/bikes.yaml".to_string()),
            _ => None,
        });
        assert_eq!(env.currency_symbol(), "£");
        assert_eq!(env.get("catalog").as_deref(), Some("/tmp/bikes.yaml"));
        assert!(env.default_format.is_none());
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "currency_symbol: \"€\"\ndefault_format: tsv").unwrap();
        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.currency_symbol(), "€");
        assert_eq!(config.get("default_format").as_deref(), Some("tsv"));
    }

    #[test]
    fn test_read_invalid_or_empty_file() {
        let mut bad = NamedTempFile::new().unwrap();
        writeln!(bad, "currency_symbol: [unclosed").unwrap();
        assert!(Config::read_file(bad.path()).is_none());

        let empty = NamedTempFile::new().unwrap();
        assert!(Config::read_file(empty.path()).is_none());
    }

    #[test]
    fn test_default_currency() {
        assert_eq!(Config::default().currency_symbol(), "$");
        assert!(Config::is_valid_key("catalog"));
        assert!(!Config::is_valid_key("author"));
    }
}
