//! Table formatting for CLI list commands
//!
//! Every list command builds [`TableRow`]s of typed [`CellValue`]s and hands
//! them to a [`TableFormatter`], which renders TSV (aligned, colored on a
//! terminal), CSV, Markdown, or bare IDs.

use chrono::NaiveDate;
use console::style;

use crate::cli::helpers::{
    escape_csv, format_hours, style_part_status, style_project_status, truncate_str,
};
use crate::cli::OutputFormat;
use crate::core::entity::{PartStatus, ProjectStatus};
use crate::core::shortid::ShortIdIndex;

/// Configuration for table output
#[derive(Debug, Clone)]
pub struct TableConfig {
    /// Maximum width for text columns before wrapping (None = truncate instead)
    pub wrap_width: Option<usize>,
    /// Show summary line after table (e.g., "5 part(s) found")
    pub show_summary: bool,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            wrap_width: None,
            show_summary: true,
        }
    }
}

impl TableConfig {
    /// List output: wrap text at `wrap` when given, drop the summary when quiet
    pub fn for_list(wrap: Option<usize>, quiet: bool) -> Self {
        Self {
            wrap_width: wrap,
            show_summary: !quiet,
        }
    }
}

/// Break text at word boundaries so no line exceeds `max_width` characters
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if text.chars().count() <= max_width || max_width < 5 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let current_len = current.chars().count();

        if !current.is_empty() && current_len + 1 + word_len <= max_width {
            current.push(' ');
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        // Hard-break words longer than a whole line
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(max_width).peekable();
        while let Some(chunk) = chunks.next() {
            let piece: String = chunk.iter().collect();
            if chunks.peek().is_some() {
                lines.push(piece);
            } else {
                current = piece;
            }
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Entity ID (cyan)
    Id(String),
    /// Plain text, truncated to the column
    Text(String),
    ProjectStatus(ProjectStatus),
    PartStatus(PartStatus),
    /// Category label; `None` shows as "-"
    Category(Option<String>),
    Date(Option<NaiveDate>),
    /// Pre-formatted amount, right-aligned
    Money(String),
    Hours(Option<f64>),
}

impl CellValue {
    /// Unstyled text of the cell
    pub fn raw(&self) -> String {
        match self {
            CellValue::Id(s) | CellValue::Text(s) | CellValue::Money(s) => s.clone(),
            CellValue::ProjectStatus(status) => status.to_string(),
            CellValue::PartStatus(status) => status.to_string(),
            CellValue::Category(c) => c.clone().unwrap_or_default(),
            CellValue::Date(d) => d.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            CellValue::Hours(h) => h.map(|h| h.to_string()).unwrap_or_default(),
        }
    }

    /// Text shown in human-facing tables ("-" for missing values)
    fn display(&self) -> String {
        match self {
            CellValue::Hours(h) => format_hours(*h),
            other => {
                let raw = other.raw();
                if raw.is_empty() {
                    "-".to_string()
                } else {
                    raw
                }
            }
        }
    }

    /// Aligned, colored cell for terminal output
    pub fn format_tsv(&self, width: usize) -> String {
        match self {
            CellValue::Id(id) => format!("{:<width$}", style(truncate_str(id, width)).cyan()),
            CellValue::Text(s) => format!("{:<width$}", truncate_str(s, width.saturating_sub(2))),
            CellValue::ProjectStatus(s) => format!("{:<width$}", style_project_status(*s)),
            CellValue::PartStatus(s) => format!("{:<width$}", style_part_status(*s)),
            CellValue::Category(None) | CellValue::Date(None) => {
                format!("{:<width$}", style("-").dim())
            }
            CellValue::Money(s) if s.is_empty() => format!("{:>width$}", style("-").dim()),
            CellValue::Money(_) | CellValue::Hours(_) => {
                format!("{:>width$}", self.display())
            }
            other => format!("{:<width$}", truncate_str(&other.display(), width)),
        }
    }

    pub fn format_csv(&self) -> String {
        escape_csv(&self.raw())
    }

    /// Markdown cell with pipes escaped
    pub fn format_md(&self) -> String {
        self.display().replace('|', "\\|")
    }

    /// Content width for dynamic column sizing
    pub fn display_width(&self) -> usize {
        self.display().chars().count()
    }
}

/// Column definition with header label and maximum width
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub key: &'static str,
    pub header: &'static str,
    pub width: usize,
}

impl ColumnDef {
    pub const fn new(key: &'static str, header: &'static str, width: usize) -> Self {
        Self { key, header, width }
    }
}

/// A row of cell values for table output
#[derive(Debug, Clone)]
pub struct TableRow {
    pub short_id: String,
    pub full_id: String,
    pub cells: Vec<(&'static str, CellValue)>,
}

impl TableRow {
    pub fn new(full_id: String, short_ids: &ShortIdIndex) -> Self {
        let short_id = short_ids.get_short_id(&full_id).unwrap_or_default();
        Self {
            short_id,
            full_id,
            cells: Vec::new(),
        }
    }

    pub fn cell(mut self, key: &'static str, value: CellValue) -> Self {
        self.cells.push((key, value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

/// Renders rows in the requested output format
pub struct TableFormatter<'a> {
    columns: &'a [ColumnDef],
    entity_name: &'static str,
    entity_prefix: &'static str,
    config: TableConfig,
}

impl<'a> TableFormatter<'a> {
    pub fn new(columns: &'a [ColumnDef], entity_name: &'static str, entity_prefix: &'static str) -> Self {
        Self {
            columns,
            entity_name,
            entity_prefix,
            config: TableConfig::default(),
        }
    }

    pub fn with_config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// Print rows in `format`, limited to `visible_columns`
    pub fn output(&self, rows: &[TableRow], format: OutputFormat, visible_columns: &[&str]) {
        let columns: Vec<&ColumnDef> = self
            .columns
            .iter()
            .filter(|c| visible_columns.contains(&c.key))
            .collect();

        match format {
            OutputFormat::Csv => self.output_csv(rows, &columns),
            OutputFormat::Md => self.output_md(rows, &columns),
            OutputFormat::Id => rows.iter().for_each(|r| println!("{}", r.full_id)),
            OutputFormat::ShortId => rows.iter().for_each(|r| println!("{}", r.short_id)),
            _ => self.output_tsv(rows, &columns),
        }
    }

    /// Column widths sized to content, capped at each column's width
    fn widths(&self, rows: &[TableRow], columns: &[&ColumnDef]) -> Vec<usize> {
        let short = rows.iter().map(|r| r.short_id.len()).max().unwrap_or(0).max(5);
        let mut widths = vec![short];
        for col in columns {
            let content = rows
                .iter()
                .filter_map(|r| r.get(col.key))
                .map(CellValue::display_width)
                .max()
                .unwrap_or(0);
            widths.push(col.header.len().max(content + 2).min(col.width));
        }
        widths
    }

    fn output_tsv(&self, rows: &[TableRow], columns: &[&ColumnDef]) {
        let widths = self.widths(rows, columns);

        let mut header = vec![format!("{:<w$}", style("SHORT").bold().dim(), w = widths[0])];
        for (col, w) in columns.iter().zip(&widths[1..]) {
            header.push(format!("{:<w$}", style(col.header).bold(), w = *w));
        }
        println!("{}", header.join(" "));
        println!("{}", "-".repeat(widths.iter().sum::<usize>() + widths.len() - 1));

        for row in rows {
            match self.config.wrap_width {
                Some(wrap) => self.output_wrapped_row(row, columns, &widths, wrap),
                None => {
                    let mut parts = vec![format!("{:<w$}", style(&row.short_id).cyan(), w = widths[0])];
                    for (col, w) in columns.iter().zip(&widths[1..]) {
                        parts.push(match row.get(col.key) {
                            Some(value) => value.format_tsv(*w),
                            None => format!("{:<w$}", "-", w = *w),
                        });
                    }
                    println!("{}", parts.join(" "));
                }
            }
        }

        if self.config.show_summary {
            println!();
            println!(
                "{} {}(s) found. Use {} to reference by short ID.",
                style(rows.len()).cyan(),
                self.entity_name,
                style(format!("{}@N", self.entity_prefix)).cyan()
            );
        }
    }

    fn output_wrapped_row(&self, row: &TableRow, columns: &[&ColumnDef], widths: &[usize], wrap: usize) {
        let mut cells: Vec<Vec<String>> = vec![vec![row.short_id.clone()]];
        for col in columns {
            cells.push(match row.get(col.key) {
                Some(CellValue::Text(s)) => wrap_text(s, wrap),
                Some(value) => vec![value.display()],
                None => vec!["-".to_string()],
            });
        }

        let height = cells.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            let parts: Vec<String> = cells
                .iter()
                .enumerate()
                .map(|(i, lines)| {
                    let text = lines.get(line).map(String::as_str).unwrap_or("");
                    let w = widths.get(i).copied().unwrap_or(10);
                    if i == 0 {
                        format!("{:<w$}", style(text).cyan())
                    } else {
                        format!("{:<w$}", text)
                    }
                })
                .collect();
            println!("{}", parts.join(" "));
        }
        if height > 1 {
            println!();
        }
    }

    fn output_csv(&self, rows: &[TableRow], columns: &[&ColumnDef]) {
        let mut header = vec!["short_id", "id"];
        header.extend(columns.iter().map(|c| c.key));
        println!("{}", header.join(","));

        for row in rows {
            let mut values = vec![escape_csv(&row.short_id), escape_csv(&row.full_id)];
            values.extend(
                columns
                    .iter()
                    .map(|c| row.get(c.key).map(CellValue::format_csv).unwrap_or_default()),
            );
            println!("{}", values.join(","));
        }
    }

    fn output_md(&self, rows: &[TableRow], columns: &[&ColumnDef]) {
        let mut header = vec!["Short", "ID"];
        header.extend(columns.iter().map(|c| c.header));
        println!("| {} |", header.join(" | "));
        println!("|{}|", vec!["---"; header.len()].join("|"));

        for row in rows {
            let mut values = vec![row.short_id.clone(), row.full_id.clone()];
            values.extend(columns.iter().map(|c| {
                row.get(c.key)
                    .map(CellValue::format_md)
                    .unwrap_or_else(|| "-".to_string())
            }));
            println!("| {} |", values.join(" | "));
        }
    }
}
