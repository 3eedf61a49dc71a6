//! Currency values: numeric amounts or currency-formatted text

use serde::{Deserialize, Serialize};

/// Default currency symbol for display
pub const DEFAULT_CURRENCY: &str = "$";

/// A cost as entered: either a plain number or free text such as "$1,024.99"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cost {
    Amount(f64),
    Text(String),
}

impl Cost {
    /// Numeric value, if one can be recovered
    ///
    /// Text that does not parse yields `None`; aggregates treat that as zero.
    pub fn amount(&self) -> Option<f64> {
        match self {
            Cost::Amount(value) => Some(*value),
            Cost::Text(text) => parse_currency(text),
        }
    }

    /// Amount with unparsable text counted as zero
    pub fn amount_or_zero(&self) -> f64 {
        self.amount().unwrap_or(0.0)
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Cost::Text(text) if text.trim().is_empty())
    }

    /// Parse form input: a plain number becomes an amount, other text is kept as entered
    pub fn from_input(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<f64>() {
            Ok(value) if value.is_finite() => Cost::Amount(value),
            _ => Cost::Text(input.to_string()),
        }
    }

    /// The cost as a form field value; amounts stay plain numbers
    pub fn to_input(&self) -> String {
        match self {
            Cost::Amount(value) => value.to_string(),
            Cost::Text(text) => text.clone(),
        }
    }
}

impl Default for Cost {
    fn default() -> Self {
        Cost::Text(String::new())
    }
}

impl From<f64> for Cost {
    fn from(value: f64) -> Self {
        Cost::Amount(value)
    }
}

impl From<&str> for Cost {
    fn from(text: &str) -> Self {
        Cost::Text(text.to_string())
    }
}

impl std::fmt::Display for Cost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cost::Amount(value) => write!(f, "{}", format_currency(*value, DEFAULT_CURRENCY)),
            Cost::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Parse currency-formatted text by stripping everything but digits, `.` and `-`
///
/// `"$1,024.50"` → `Some(1024.5)`, `"TBD"` → `None`.
pub fn parse_currency(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Format an amount with a currency symbol and two decimals
pub fn format_currency(amount: f64, symbol: &str) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", symbol, amount.abs())
    } else {
        format!("{}{:.2}", symbol, amount)
    }
}
