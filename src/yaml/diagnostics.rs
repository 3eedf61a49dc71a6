//! Source-located diagnostics for YAML catalog files

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// YAML syntax or shape error pointing into the offending file
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid catalog YAML: {message}")]
#[diagnostic(code(velo::yaml::syntax))]
pub struct YamlSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, locating it in `source`
    pub fn from_serde_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        let offset = line_col_to_offset(source, line, column);
        let message = err.to_string();
        let help = suggest_fix(&message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1)),
            help,
            message,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors raised while reading a YAML file
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Cannot read {path}: {source}")]
    #[diagnostic(code(velo::yaml::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Byte offset of a 1-based line/column position, clamped to the source
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let line_start = if line <= 1 {
        Some(0)
    } else {
        source
            .match_indices('\n')
            .nth(line - 2)
            .map(|(i, _)| i + 1)
    };

    let Some(start) = line_start else {
        return source.len().saturating_sub(1);
    };

    let line_text = source[start..].split('\n').next().unwrap_or("");
    let within = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    (start + within).min(source.len().saturating_sub(1))
}

fn suggest_fix(message: &str) -> Option<String> {
    let msg = message.to_lowercase();

    if msg.contains("tab") {
        return Some("Indent with spaces, not tabs.".to_string());
    }
    if msg.contains("duplicate") {
        return Some("Each key may appear once per record.".to_string());
    }
    if msg.contains("missing field") {
        return Some(
            "Projects need id, title, start_date and target_date; parts need id, project_id and name."
                .to_string(),
        );
    }
    if msg.contains("input contains invalid characters") || msg.contains("premature end") {
        return Some("Dates are written YYYY-MM-DD, e.g. 2024-03-15.".to_string());
    }
    if msg.contains("unknown variant") {
        return Some(
            "Project statuses: not-started, in-progress, completed, on-hold. \
             Part statuses: needed, ordered, received, installed."
                .to_string(),
        );
    }
    if msg.contains("mapping values are not allowed") {
        return Some("Quote values that contain ': '.".to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let source = "line1\nline2\nline3";
        assert_eq!(line_col_to_offset(source, 1, 1), 0);
        assert_eq!(line_col_to_offset(source, 2, 1), 6);
        assert_eq!(line_col_to_offset(source, 3, 3), 14);
    }

    #[test]
    fn test_offset_clamped_past_end() {
        let source = "a: 1\n";
        assert!(line_col_to_offset(source, 9, 1) < source.len());
    }

    #[test]
    fn test_suggestions() {
        assert!(suggest_fix("unknown variant `done`").is_some());
        assert!(suggest_fix("missing field `title`").is_some());
        assert!(suggest_fix("something else").is_none());
    }
}
