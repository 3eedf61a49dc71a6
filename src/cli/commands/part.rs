//! `velo part` command - Parts tracker

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{display_ref, print_done, print_not_saved, print_structured, rule};
use crate::cli::helpers::{format_cost, format_date, style_part_status};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::aggregate::{distinct_categories, part_totals};
use crate::core::entity::PartStatus;
use crate::core::filter::{filter, Choice, Criteria};
use crate::core::form::PartForm;
use crate::core::money::format_currency;
use crate::core::sort::{sort, PartSortKey, SortDirection};
use crate::entities::PartRow;

#[derive(Subcommand, Debug)]
pub enum PartCommands {
    /// List parts with filtering, sorting and totals
    List(ListArgs),

    /// Show a part's details
    Show(ShowArgs),

    /// Add a part to a project
    New(NewArgs),

    /// Edit a part (use --status to move it along)
    Edit(EditArgs),

    /// Delete a part
    Delete(DeleteArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Name,
    Number,
    Project,
    Category,
    Status,
    Supplier,
    Cost,
    Ordered,
    Arrival,
}

impl ListColumn {
    fn key(self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Name => "name",
            ListColumn::Number => "number",
            ListColumn::Project => "project",
            ListColumn::Category => "category",
            ListColumn::Status => "status",
            ListColumn::Supplier => "supplier",
            ListColumn::Cost => "cost",
            ListColumn::Ordered => "ordered",
            ListColumn::Arrival => "arrival",
        }
    }
}

impl std::fmt::Display for ListColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

const COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 30),
    ColumnDef::new("name", "NAME", 34),
    ColumnDef::new("number", "PART #", 14),
    ColumnDef::new("project", "PROJECT", 28),
    ColumnDef::new("category", "CATEGORY", 16),
    ColumnDef::new("status", "STATUS", 11),
    ColumnDef::new("supplier", "SUPPLIER", 22),
    ColumnDef::new("cost", "COST", 11),
    ColumnDef::new("ordered", "ORDERED", 12),
    ColumnDef::new("arrival", "ARRIVAL", 12),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in name, description, part number, supplier and project title
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status (needed, ordered, received, installed, all)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Filter by category (exact match, or all)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Only parts of this project (ID, PROJ@N or title fragment)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Sort by field
    #[arg(long, default_value = "name")]
    pub sort: PartSortKey,

    /// Sort descending
    #[arg(long, short = 'r')]
    pub desc: bool,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Name,
        ListColumn::Project,
        ListColumn::Category,
        ListColumn::Status,
        ListColumn::Supplier,
        ListColumn::Cost,
    ])]
    pub columns: Vec<ListColumn>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Wrap text in columns (mobile-friendly output with specified width)
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Part ID, short ID (PART@N) or name fragment
    pub reference: String,
}

/// Part fields settable from flags
#[derive(clap::Args, Debug, Default)]
pub struct PartFields {
    /// Part name
    #[arg(long)]
    pub name: Option<String>,

    /// Manufacturer part number
    #[arg(long)]
    pub number: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Category (e.g. Drivetrain, Braking)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Status (needed, ordered, received, installed)
    #[arg(long, short = 's')]
    pub status: Option<PartStatus>,

    /// Supplier name
    #[arg(long)]
    pub supplier: Option<String>,

    /// Cost, e.g. "$24.99"
    #[arg(long)]
    pub cost: Option<String>,

    /// Order date (YYYY-MM-DD)
    #[arg(long)]
    pub ordered: Option<String>,

    /// Projected arrival (YYYY-MM-DD)
    #[arg(long)]
    pub arrival: Option<String>,

    /// Received date (YYYY-MM-DD)
    #[arg(long)]
    pub received: Option<String>,

    /// Installed date (YYYY-MM-DD)
    #[arg(long)]
    pub installed: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl PartFields {
    fn apply(&self, form: &mut PartForm) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        set(&mut form.name, &self.name);
        set(&mut form.part_number, &self.number);
        set(&mut form.description, &self.description);
        set(&mut form.category, &self.category);
        set(&mut form.supplier, &self.supplier);
        set(&mut form.cost, &self.cost);
        set(&mut form.order_date, &self.ordered);
        set(&mut form.projected_arrival, &self.arrival);
        set(&mut form.received_date, &self.received);
        set(&mut form.installed_date, &self.installed);
        set(&mut form.notes, &self.notes);
        if let Some(status) = self.status {
            form.status = status;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Owning project (ID, PROJ@N or title fragment)
    #[arg(long, short = 'p')]
    pub project: String,

    #[command(flatten)]
    pub fields: PartFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Part ID, short ID (PART@N) or name fragment
    pub reference: String,

    #[command(flatten)]
    pub fields: PartFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Part ID, short ID (PART@N) or name fragment
    pub reference: String,
}

/// Run a part subcommand
pub fn run(cmd: PartCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        PartCommands::List(args) => run_list(args, &session),
        PartCommands::Show(args) => run_show(args, &session),
        PartCommands::New(args) => run_new(args, &session),
        PartCommands::Edit(args) => run_edit(args, &session),
        PartCommands::Delete(args) => run_delete(args, &session),
    }
}

fn run_list(args: ListArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;

    // The project scope bounds both the listing and its totals
    let scope: Vec<PartRow> = match args.project.as_deref() {
        Some(reference) => {
            let project = catalog.find_project(reference)?;
            catalog
                .part_rows()
                .into_iter()
                .filter(|row| row.part.project_id == project.id)
                .collect()
        }
        None => catalog.part_rows(),
    };

    let criteria = Criteria {
        text: args.search.clone(),
        status: Choice::lenient(args.status.as_deref()),
        category: Choice::lenient(args.category.as_deref()),
    };
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };

    let mut rows = sort(&filter(&scope, &criteria), args.sort, direction);
    if let Some(limit) = args.limit {
        rows.truncate(limit);
    }

    if args.count {
        println!("{}", rows.len());
        return Ok(());
    }

    let format = session.format_or(OutputFormat::Tsv);
    if print_structured(&rows, format)? {
        return Ok(());
    }

    if rows.is_empty() {
        println!("No parts found.");
    } else {
        let refs = catalog.part_refs();
        let currency = session.currency();
        let table_rows: Vec<TableRow> = rows
            .iter()
            .map(|row| {
                let part = &row.part;
                TableRow::new(part.id.to_string(), &refs)
                    .cell("id", CellValue::Id(part.id.to_string()))
                    .cell("name", CellValue::Text(part.name.clone()))
                    .cell("number", CellValue::Text(part.part_number.clone()))
                    .cell("project", CellValue::Text(row.project_title.clone()))
                    .cell("category", CellValue::Category(part.category.clone()))
                    .cell("status", CellValue::PartStatus(part.status))
                    .cell("supplier", CellValue::Text(part.supplier.clone()))
                    .cell("cost", CellValue::Money(format_cost(&part.cost, currency)))
                    .cell("ordered", CellValue::Date(part.order_date))
                    .cell("arrival", CellValue::Date(part.expected_arrival()))
            })
            .collect();

        let visible: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
        TableFormatter::new(COLUMNS, "part", "PART")
            .with_config(TableConfig::for_list(args.wrap, session.quiet))
            .output(&table_rows, format, &visible);
    }

    if format == OutputFormat::Tsv && !session.quiet {
        let totals = part_totals(&scope);
        println!(
            "{} {} part(s) · {} total value · {} on order · {} installed",
            style("Totals:").dim(),
            totals.count,
            style(format_currency(totals.total_value, session.currency())).green(),
            totals.on_order,
            totals.installed
        );
        let categories = distinct_categories(&scope);
        if !categories.is_empty() {
            println!("{} {}", style("Categories:").dim(), categories.join(", "));
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;
    let part = catalog.find_part(&args.reference)?;
    let row = PartRow {
        part: part.clone(),
        project_title: catalog.project_title(&part.project_id).to_string(),
    };

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&row, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => println!("{}", part.id),
        OutputFormat::ShortId => println!("{}", display_ref(&catalog.part_refs(), &part.id)),
        _ => {
            let currency = session.currency();
            println!("{}", rule());
            println!(
                "{}: {}",
                style(display_ref(&catalog.part_refs(), &part.id)).cyan(),
                style(&part.name).bold()
            );
            println!(
                "{}: {} ({})",
                style("Project").bold(),
                row.project_title,
                style(display_ref(&catalog.project_refs(), &part.project_id)).dim()
            );
            println!("{}: {}", style("Status").bold(), style_part_status(part.status));
            if let Some(ref category) = part.category {
                println!("{}: {}", style("Category").bold(), category);
            }
            if !part.part_number.is_empty() {
                println!("{}: {}", style("Part number").bold(), part.part_number);
            }
            println!("{}", rule());

            if !part.description.is_empty() {
                println!();
                println!("{}", part.description);
                println!();
            }

            let supplier = if part.supplier.is_empty() { "-" } else { part.supplier.as_str() };
            let cost = format_cost(&part.cost, currency);
            println!("{}: {}", style("Supplier").bold(), supplier);
            println!(
                "{}: {}",
                style("Cost").bold(),
                if cost.is_empty() { "-".to_string() } else { cost }
            );
            println!(
                "{}: {}  {}: {}",
                style("Ordered").bold(),
                format_date(part.order_date),
                style("Expected").bold(),
                format_date(part.expected_arrival())
            );
            println!(
                "{}: {}  {}: {}",
                style("Received").bold(),
                format_date(part.received_date),
                style("Installed").bold(),
                format_date(part.installed_date)
            );

            if !part.notes.is_empty() {
                println!();
                println!("{}", style("Notes:").bold());
                println!("{}", part.notes);
            }
            println!("{}", rule());
        }
    }
    Ok(())
}

fn run_new(args: NewArgs, session: &Session) -> Result<()> {
    let project = session.catalog.find_project(&args.project)?;

    let mut form = PartForm::default();
    args.fields.apply(&mut form);
    if args.interactive {
        form = FormWizard::new().part(form)?;
    }

    let part = form.submit(project.id.clone())?;
    let catalog = session.catalog.with_part(part.clone());

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&part, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => println!("{}", part.id),
        OutputFormat::ShortId => println!("{}", display_ref(&catalog.part_refs(), &part.id)),
        _ => {
            print_done("Created", "part", &display_ref(&catalog.part_refs(), &part.id), &part.name);
            println!(
                "   {} for {} · {} part(s) on this project",
                style_part_status(part.status),
                project.title,
                catalog.parts_for(&project.id).len()
            );
            print_not_saved(session.quiet);
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, session: &Session) -> Result<()> {
    let existing = session.catalog.find_part(&args.reference)?;
    let mut form = PartForm::from_part(existing);
    args.fields.apply(&mut form);
    if args.interactive {
        form = FormWizard::new().part(form)?;
    }

    let updated = form.submit_edit(existing)?;
    let catalog = session.catalog.replacing_part(updated)?;
    let part = catalog.part(&existing.id)?;

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(part, format)? {
        return Ok(());
    }
    print_done("Updated", "part", &display_ref(&catalog.part_refs(), &part.id), &part.name);
    if existing.status != part.status {
        println!(
            "   {} → {}",
            style_part_status(existing.status),
            style_part_status(part.status)
        );
    }
    print_not_saved(session.quiet);
    Ok(())
}

fn run_delete(args: DeleteArgs, session: &Session) -> Result<()> {
    let part = session.catalog.find_part(&args.reference)?;
    let reference = display_ref(&session.catalog.part_refs(), &part.id);
    let catalog = session.catalog.without_part(&part.id)?;

    print_done("Deleted", "part", &reference, &part.name);
    println!("   {} part(s) remain", catalog.parts.len());
    print_not_saved(session.quiet);
    Ok(())
}
