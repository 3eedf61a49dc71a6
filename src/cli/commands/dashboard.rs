//! `velo dashboard` command - Workshop overview

use console::style;
use miette::Result;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::commands::utils::print_structured;
use crate::cli::helpers::{format_cost, preview, style_project_status};
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::aggregate::{
    completion_rate, cost_summaries, cost_totals, count_by_status, part_totals, CostTotals,
    PartTotals, ProjectCostSummary, StatusCounts,
};
use crate::core::entity::{PartStatus, ProjectStatus};
use crate::core::filter::{filter, Criteria};
use crate::core::money::format_currency;
use crate::core::Catalog;
use crate::entities::PartRow;

const BAR_WIDTH: usize = 48;

#[derive(clap::Args, Debug)]
pub struct DashboardArgs {
    /// Parts shown per list before "+N more"
    #[arg(long, short = 'n', default_value_t = 5)]
    pub limit: usize,
}

#[derive(Serialize)]
struct Dashboard {
    projects: StatusCounts<ProjectStatus>,
    completion_rate: u32,
    parts: PartTotals,
    parts_by_status: StatusCounts<PartStatus>,
    on_order: Vec<PartRow>,
    needed: Vec<PartRow>,
    costs: Vec<ProjectCostSummary>,
    cost_totals: CostTotals,
}

impl Dashboard {
    fn collect(catalog: &Catalog) -> Self {
        let rows = catalog.part_rows();
        let projects = count_by_status(&catalog.projects);
        let costs = cost_summaries(&catalog.projects, &catalog.parts);
        Self {
            completion_rate: completion_rate(&projects),
            projects,
            parts: part_totals(&rows),
            parts_by_status: count_by_status(&rows),
            on_order: filter(&rows, &Criteria::default().with_status(PartStatus::Ordered)),
            needed: filter(&rows, &Criteria::default().with_status(PartStatus::Needed)),
            cost_totals: cost_totals(&rows, &costs),
            costs,
        }
    }
}

pub fn run(args: DashboardArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let dashboard = Dashboard::collect(&session.catalog);

    if print_structured(&dashboard, session.format_or(OutputFormat::Auto))? {
        return Ok(());
    }

    let currency = session.currency();
    let width = 68;

    println!("{}", style("Velo Workshop Dashboard").bold().underlined());
    println!("{}", "═".repeat(width));
    println!();

    let project_lines: Vec<String> = dashboard
        .projects
        .iter()
        .map(|(status, n)| format!("{:<14} {:>3}", status.label(), n))
        .chain([
            format!("{:<14} {:>3}", "Total", dashboard.projects.total()),
            format!("{:<14} {:>3}%", "Completion", dashboard.completion_rate),
        ])
        .collect();
    let part_lines: Vec<String> = dashboard
        .parts_by_status
        .iter()
        .map(|(status, n)| format!("{:<14} {:>3}", status.label(), n))
        .chain([format!(
            "{:<14} {}",
            "Total value",
            format_currency(dashboard.parts.total_value, currency)
        )])
        .collect();
    print_two_columns("PROJECTS", &project_lines, "PARTS", &part_lines);

    println!();
    println!("  {}", render_status_bar(&dashboard.projects));
    let legend: Vec<String> = dashboard
        .projects
        .iter()
        .map(|(status, _)| format!("{} {}", style_project_status(status), status.label()))
        .collect();
    println!("  {}", style(legend.join("  ")).dim());

    println!();
    print_part_preview("ON ORDER", &dashboard.on_order, args.limit, currency);
    println!();
    print_part_preview("NEEDED", &dashboard.needed, args.limit, currency);

    println!();
    println!("{}", style("COST SUMMARY").bold());
    let totals = &dashboard.cost_totals;
    println!(
        "  Parts value {}  ·  Project parts {}  ·  Final costs {}",
        style(format_currency(totals.parts_value, currency)).green(),
        style(format_currency(totals.parts_total, currency)).cyan(),
        style(format_currency(totals.final_total, currency)).yellow()
    );
    let mut table = Builder::default();
    table.push_record([
        "Project".to_string(),
        "Parts".to_string(),
        "Estimated".to_string(),
        "Actual".to_string(),
        "Variance".to_string(),
    ]);
    let money = |amount: Option<f64>| {
        amount
            .map(|a| format_currency(a, currency))
            .unwrap_or_else(|| "-".to_string())
    };
    for summary in &dashboard.costs {
        table.push_record([
            summary.title.clone(),
            format_currency(summary.parts_total, currency),
            money(summary.estimated),
            money(summary.actual),
            variance_text(summary, currency),
        ]);
    }
    table.push_record([
        "Total".to_string(),
        format_currency(totals.parts_total, currency),
        String::new(),
        format_currency(totals.final_total, currency),
        String::new(),
    ]);
    println!("{}", table.build().with(Style::rounded()));

    Ok(())
}

/// Variance with its direction, e.g. "$362.01 over"
fn variance_text(summary: &ProjectCostSummary, currency: &str) -> String {
    match (summary.variance, summary.over_budget) {
        (Some(variance), Some(true)) => format!("{} over", format_currency(variance, currency)),
        (Some(variance), _) => format!("{} under", format_currency(variance, currency)),
        (None, _) => "-".to_string(),
    }
}

fn print_two_columns(title1: &str, lines1: &[String], title2: &str, lines2: &[String]) {
    let col_width = 32;

    println!("{:<col_width$} {}", style(title1).bold(), style(title2).bold());
    println!("{:-<col_width$} {:-<col_width$}", "", "");

    let max_lines = lines1.len().max(lines2.len());
    for i in 0..max_lines {
        let l1 = lines1.get(i).map(|s| s.as_str()).unwrap_or("");
        let l2 = lines2.get(i).map(|s| s.as_str()).unwrap_or("");
        println!("  {:<30} {}", l1, l2);
    }
}

fn print_part_preview(title: &str, rows: &[PartRow], limit: usize, currency: &str) {
    println!("{} ({})", style(title).bold(), rows.len());
    if rows.is_empty() {
        println!("  {}", style("none").dim());
        return;
    }
    let (shown, more) = preview(rows, limit);
    for row in shown {
        let cost = format_cost(&row.part.cost, currency);
        println!(
            "  • {} {} {}",
            row.part.name,
            style(format!("({})", row.project_title)).dim(),
            cost
        );
    }
    if more > 0 {
        println!("  {}", style(format!("+{} more", more)).dim());
    }
}

/// Segment widths of a status bar `width` cells wide, one per status
///
/// Cumulative rounding keeps the segments summing to exactly `width`.
fn status_segments(counts: &StatusCounts<ProjectStatus>, width: usize) -> Vec<(ProjectStatus, usize)> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }
    let mut cumulative = 0;
    let mut drawn = 0;
    counts
        .iter()
        .map(|(status, n)| {
            cumulative += n;
            let end = (cumulative as f64 / total as f64 * width as f64).round() as usize;
            let segment = end - drawn;
            drawn = end;
            (status, segment)
        })
        .collect()
}

fn render_status_bar(counts: &StatusCounts<ProjectStatus>) -> String {
    let segments = status_segments(counts, BAR_WIDTH);
    if segments.is_empty() {
        return style("░".repeat(BAR_WIDTH)).dim().to_string();
    }
    segments
        .into_iter()
        .map(|(status, cells)| {
            let block = "█".repeat(cells);
            match status {
                ProjectStatus::NotStarted => style(block).dim().to_string(),
                ProjectStatus::InProgress => style(block).cyan().to_string(),
                ProjectStatus::Completed => style(block).green().to_string(),
                ProjectStatus::OnHold => style(block).yellow().to_string(),
            }
        })
        .collect()
}
