//! Shared helper functions for CLI commands

use chrono::{Local, NaiveDate};
use console::{style, StyledObject};

use crate::core::entity::{PartStatus, ProjectStatus};
use crate::core::money::{format_currency, Cost};

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Truncate a string to `max_len` characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a string for CSV output (RFC 4180)
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Display a cost: numbers get the currency symbol, text is shown as entered
pub fn format_cost(cost: &Cost, symbol: &str) -> String {
    match cost {
        Cost::Amount(amount) => format_currency(*amount, symbol),
        Cost::Text(text) => text.trim().to_string(),
    }
}

pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Hours without a trailing ".0"
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) if h.fract() == 0.0 => format!("{}h", h as i64),
        Some(h) => format!("{:.1}h", h),
        None => "-".to_string(),
    }
}

/// The first `limit` items plus how many were left out
pub fn preview<T>(items: &[T], limit: usize) -> (&[T], usize) {
    let shown = items.len().min(limit);
    (&items[..shown], items.len() - shown)
}

pub fn style_project_status(status: ProjectStatus) -> StyledObject<&'static str> {
    let s = status.as_str();
    match status {
        ProjectStatus::NotStarted => style(s).dim(),
        ProjectStatus::InProgress => style(s).cyan(),
        ProjectStatus::Completed => style(s).green(),
        ProjectStatus::OnHold => style(s).yellow(),
    }
}

pub fn style_part_status(status: PartStatus) -> StyledObject<&'static str> {
    let s = status.as_str();
    match status {
        PartStatus::Needed => style(s).red(),
        PartStatus::Ordered => style(s).yellow(),
        PartStatus::Received => style(s).cyan(),
        PartStatus::Installed => style(s).green(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("Cinelli Stem – 110mm", 10), "Cinelli...");
    }

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("simple"), "simple");
        assert_eq!(escape_csv("Wheels & Tires"), "Wheels & Tires");
        assert_eq!(escape_csv("$1,024.00"), "\"$1,024.00\"");
        assert_eq!(escape_csv("with\"quote"), "\"with\"\"quote\"");
    }

    #[test]
    fn test_format_cost() {
        assert_eq!(format_cost(&Cost::Amount(450.0), "$"), "$450.00");
        assert_eq!(format_cost(&Cost::from("$24.99"), "€"), "$24.99");
        assert_eq!(format_cost(&Cost::default(), "$"), "");
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(Some(8.0)), "8h");
        assert_eq!(format_hours(Some(2.5)), "2.5h");
        assert_eq!(format_hours(None), "-");
    }

    #[test]
    fn test_preview() {
        let items = [1, 2, 3, 4, 5, 6, 7];
        let (shown, more) = preview(&items, 5);
        assert_eq!(shown, &[1, 2, 3, 4, 5]);
        assert_eq!(more, 2);
        assert_eq!(preview(&items[..2], 5).1, 0);
    }
}
