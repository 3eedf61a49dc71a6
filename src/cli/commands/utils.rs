//! Shared utilities for CLI commands

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::core::identity::EntityId;
use crate::core::shortid::ShortIdIndex;

/// Print `value` as JSON or YAML; returns false for every other format
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Short reference for an entity, falling back to the full ID
pub fn display_ref(refs: &ShortIdIndex, id: &EntityId) -> String {
    refs.get_short_id(id.as_str())
        .unwrap_or_else(|| id.to_string())
}

/// One-line confirmation such as "✓ Created part PART@11"
pub fn print_done(verb: &str, kind: &str, reference: &str, title: &str) {
    println!(
        "{} {} {} {}",
        style("✓").green(),
        verb,
        kind,
        style(reference).cyan()
    );
    if !title.is_empty() {
        println!("   {}", style(title).yellow());
    }
}

/// Catalog sources are read-only; say so after a change
pub fn print_not_saved(quiet: bool) {
    if !quiet {
        println!(
            "{}",
            style("Catalog source is read-only; this change was not saved.").dim()
        );
    }
}

/// Horizontal rule used by detail views
pub fn rule() -> String {
    style("─".repeat(60)).dim().to_string()
}

/// Split a `A:B:C` flag value into at most `n` trimmed fields
pub fn split_fields(value: &str, n: usize) -> Vec<String> {
    value.splitn(n, ':').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::EntityPrefix;

    #[test]
    fn test_display_ref() {
        let ids = [EntityId::from("1"), EntityId::from("2")];
        let refs = ShortIdIndex::from_ids(EntityPrefix::Proj, ids.iter());
        assert_eq!(display_ref(&refs, &ids[1]), "PROJ@2");
        assert_eq!(display_ref(&refs, &EntityId::from("zz")), "zz");
    }

    #[test]
    fn test_split_fields() {
        assert_eq!(split_fields("Chain:Drivetrain:34.99", 3), vec!["Chain", "Drivetrain", "34.99"]);
        assert_eq!(split_fields("Frame Restoration", 2), vec!["Frame Restoration"]);
        assert_eq!(split_fields(" Tape : Cockpit ", 3), vec!["Tape", "Cockpit"]);
    }
}
