//! YAML parsing with miette diagnostics

pub mod diagnostics;

pub use diagnostics::{YamlError, YamlSyntaxError};

use serde::de::DeserializeOwned;
use std::path::Path;

/// Parse YAML text, attributing errors to `filename`
pub fn parse_yaml_str<T: DeserializeOwned>(source: &str, filename: &str) -> Result<T, YamlError> {
    serde_yml::from_str(source)
        .map_err(|e| YamlSyntaxError::from_serde_error(&e, source, filename).into())
}

/// Read and parse a YAML file
pub fn parse_yaml_file<T: DeserializeOwned>(path: &Path) -> Result<T, YamlError> {
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| YamlError::Io {
        path: display.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "parsing yaml");
    parse_yaml_str(&source, &display)
}
