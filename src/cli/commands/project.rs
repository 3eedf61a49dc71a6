//! `velo project` command - Restoration project management

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::{
    display_ref, print_done, print_not_saved, print_structured, rule, split_fields,
};
use crate::cli::helpers::{format_cost, format_date, format_hours, style_part_status, style_project_status, today};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::aggregate::{completion_rate, count_by_status, ProjectCostSummary};
use crate::core::entity::ProjectStatus;
use crate::core::filter::{filter, Choice, Criteria};
use crate::core::form::{PartDraft, ProjectForm, SubProjectDraft};
use crate::core::money::format_currency;
use crate::core::sort::{sort, ProjectSortKey, SortDirection};
use crate::core::Catalog;
use crate::entities::{Part, Photo, Project, SubProject};

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List projects with filtering and sorting
    List(ListArgs),

    /// Show a project with its sub-projects, parts, photos and costs
    Show(ShowArgs),

    /// Create a new project
    New(NewArgs),

    /// Edit a project's fields
    Edit(EditArgs),

    /// Delete a project (its parts and sub-projects are kept)
    Delete(DeleteArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Status,
    Start,
    Target,
    NextStep,
    Client,
}

impl ListColumn {
    fn key(self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Title => "title",
            ListColumn::Status => "status",
            ListColumn::Start => "start",
            ListColumn::Target => "target",
            ListColumn::NextStep => "next-step",
            ListColumn::Client => "client",
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
    ColumnDef::new("title", "TITLE", 36),
    ColumnDef::new("status", "STATUS", 13),
    ColumnDef::new("start", "START", 12),
    ColumnDef::new("target", "TARGET", 12),
    ColumnDef::new("next-step", "NEXT STEP", 44),
    ColumnDef::new("client", "CLIENT", 20),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Search in title and description (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status (not-started, in-progress, completed, on-hold, all)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Sort by field
    #[arg(long, default_value = "title")]
    pub sort: ProjectSortKey,

    /// Sort descending
    #[arg(long, short = 'r')]
    pub desc: bool,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Status,
        ListColumn::Target,
        ListColumn::NextStep,
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
    /// Project ID, short ID (PROJ@N) or title fragment
    pub reference: String,
}

/// Project fields settable from flags
#[derive(clap::Args, Debug, Default)]
pub struct ProjectFields {
    /// Project title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Description (10-500 characters)
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Status (not-started, in-progress, completed, on-hold)
    #[arg(long, short = 's')]
    pub status: Option<ProjectStatus>,

    /// The next piece of work
    #[arg(long)]
    pub next_step: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Target completion date (YYYY-MM-DD)
    #[arg(long)]
    pub target: Option<String>,

    /// Client name
    #[arg(long)]
    pub client: Option<String>,

    /// Estimated cost, e.g. "$850"
    #[arg(long)]
    pub estimated_cost: Option<String>,

    /// Final cost once known
    #[arg(long)]
    pub actual_cost: Option<String>,

    /// Date hands-on work began (YYYY-MM-DD)
    #[arg(long)]
    pub work_started: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

impl ProjectFields {
    fn apply(&self, form: &mut ProjectForm) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        set(&mut form.title, &self.title);
        set(&mut form.description, &self.description);
        set(&mut form.next_step, &self.next_step);
        set(&mut form.start_date, &self.start);
        set(&mut form.target_date, &self.target);
        set(&mut form.client, &self.client);
        set(&mut form.estimated_cost, &self.estimated_cost);
        set(&mut form.actual_cost, &self.actual_cost);
        set(&mut form.work_started, &self.work_started);
        set(&mut form.notes, &self.notes);
        if let Some(status) = self.status {
            form.status = status;
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    #[command(flatten)]
    pub fields: ProjectFields,

    /// Add a sub-project: "TITLE[:HOURS]" (repeatable)
    #[arg(long = "sub", value_name = "TITLE[:HOURS]")]
    pub sub_projects: Vec<String>,

    /// Add an initial part: "NAME:CATEGORY[:COST]" (repeatable)
    #[arg(long = "part", value_name = "NAME:CATEGORY[:COST]")]
    pub parts: Vec<String>,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Project ID, short ID (PROJ@N) or title fragment
    pub reference: String,

    #[command(flatten)]
    pub fields: ProjectFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Project ID, short ID (PROJ@N) or title fragment
    pub reference: String,
}

/// Run a project subcommand
pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        ProjectCommands::List(args) => run_list(args, &session),
        ProjectCommands::Show(args) => run_show(args, &session),
        ProjectCommands::New(args) => run_new(args, &session),
        ProjectCommands::Edit(args) => run_edit(args, &session),
        ProjectCommands::Delete(args) => run_delete(args, &session),
    }
}

fn run_list(args: ListArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;
    let criteria = Criteria {
        text: args.search.clone(),
        status: Choice::lenient(args.status.as_deref()),
        category: Choice::All,
    };
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };

    let mut projects = sort(&filter(&catalog.projects, &criteria), args.sort, direction);
    if let Some(limit) = args.limit {
        projects.truncate(limit);
    }

    if args.count {
        println!("{}", projects.len());
        return Ok(());
    }

    let format = session.format_or(OutputFormat::Tsv);
    if print_structured(&projects, format)? {
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    let refs = catalog.project_refs();
    let rows: Vec<TableRow> = projects
        .iter()
        .map(|p| {
            TableRow::new(p.id.to_string(), &refs)
                .cell("id", CellValue::Id(p.id.to_string()))
                .cell("title", CellValue::Text(p.title.clone()))
                .cell("status", CellValue::ProjectStatus(p.status))
                .cell("start", CellValue::Date(Some(p.start_date)))
                .cell("target", CellValue::Date(Some(p.target_date)))
                .cell("next-step", CellValue::Text(p.next_step.clone()))
                .cell("client", CellValue::Text(p.client.clone().unwrap_or_default()))
        })
        .collect();

    let visible: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
    TableFormatter::new(COLUMNS, "project", "PROJ")
        .with_config(TableConfig::for_list(args.wrap, session.quiet))
        .output(&rows, format, &visible);

    if format == OutputFormat::Tsv && !session.quiet {
        print_status_totals(catalog);
    }
    Ok(())
}

/// Per-status totals over every project, regardless of the active filter
fn print_status_totals(catalog: &Catalog) {
    let counts = count_by_status(&catalog.projects);
    let buckets: Vec<String> = counts
        .iter()
        .map(|(status, n)| format!("{} {}", style_project_status(status), n))
        .collect();
    println!(
        "{} {}  ({}% complete)",
        style("Totals:").dim(),
        buckets.join(" · "),
        completion_rate(&counts)
    );
}

/// A project with everything attached to it
#[derive(Serialize)]
struct ProjectDetail<'a> {
    #[serde(flatten)]
    project: &'a Project,
    sub_projects: Vec<&'a SubProject>,
    parts: Vec<&'a Part>,
    photos: Vec<&'a Photo>,
    costs: ProjectCostSummary,
}

impl<'a> ProjectDetail<'a> {
    fn gather(catalog: &'a Catalog, project: &'a Project) -> Self {
        Self {
            project,
            sub_projects: catalog.sub_projects_for(&project.id),
            parts: catalog.parts_for(&project.id),
            photos: catalog.photos_for(&project.id),
            costs: ProjectCostSummary::for_project(project, &catalog.parts),
        }
    }
}

fn run_show(args: ShowArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;
    let project = catalog.find_project(&args.reference)?;
    let detail = ProjectDetail::gather(catalog, project);

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&detail, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => println!("{}", project.id),
        OutputFormat::ShortId => println!("{}", display_ref(&catalog.project_refs(), &project.id)),
        _ => print_detail(catalog, &detail, session.currency()),
    }
    Ok(())
}

fn print_detail(catalog: &Catalog, detail: &ProjectDetail<'_>, currency: &str) {
    let project = detail.project;
    let today = today();

    println!("{}", rule());
    println!(
        "{}: {}",
        style(display_ref(&catalog.project_refs(), &project.id)).cyan(),
        style(&project.title).bold()
    );
    println!("{}: {}", style("Status").bold(), style_project_status(project.status));

    let timing = if project.status == ProjectStatus::Completed {
        style("completed".to_string()).green()
    } else if project.is_overdue(today) {
        style(format!("{} days overdue", -project.days_remaining(today))).red()
    } else {
        style(format!("{} days remaining", project.days_remaining(today))).dim()
    };
    println!(
        "{}: {}  {}: {}  ({})",
        style("Start").bold(),
        project.start_date,
        style("Target").bold(),
        project.target_date,
        timing
    );
    if let Some(started) = project.work_started {
        println!("{}: {}", style("Work started").bold(), started);
    }
    if let Some(ref client) = project.client {
        println!("{}: {}", style("Client").bold(), client);
    }
    if !project.next_step.is_empty() {
        println!("{}: {}", style("Next step").bold(), style(&project.next_step).yellow());
    }
    println!("{}", rule());

    if !project.description.is_empty() {
        println!();
        println!("{}", project.description);
    }

    if !detail.sub_projects.is_empty() {
        let refs = catalog.sub_project_refs();
        println!();
        println!("{} ({}):", style("Sub-projects").bold(), detail.sub_projects.len());
        for sub in &detail.sub_projects {
            println!(
                "  • {} {} [{}] {} / {} est.",
                style(display_ref(&refs, &sub.id)).cyan(),
                sub.title,
                style_project_status(sub.status),
                format_hours(sub.actual_hours),
                format_hours(sub.estimated_hours)
            );
        }
    }

    if !detail.parts.is_empty() {
        let refs = catalog.part_refs();
        println!();
        println!("{} ({}):", style("Parts").bold(), detail.parts.len());
        for part in &detail.parts {
            let mut line = format!(
                "  • {} {} [{}]",
                style(display_ref(&refs, &part.id)).cyan(),
                part.name,
                style_part_status(part.status)
            );
            let cost = format_cost(&part.cost, currency);
            if !cost.is_empty() {
                line.push_str(&format!(" {}", cost));
            }
            if !part.supplier.is_empty() {
                line.push_str(&format!(" from {}", part.supplier));
            }
            if let Some(arrival) = part.expected_arrival() {
                line.push_str(&format!(" (arrives {})", format_date(Some(arrival))));
            }
            println!("{}", line);
        }
    }

    if !detail.photos.is_empty() {
        let refs = catalog.photo_refs();
        println!();
        println!("{} ({}):", style("Photos").bold(), detail.photos.len());
        for photo in &detail.photos {
            let caption = if photo.caption.is_empty() { "-" } else { photo.caption.as_str() };
            println!(
                "  • {} {} {}",
                style(display_ref(&refs, &photo.id)).cyan(),
                caption,
                style(format!("({})", photo.filename)).dim()
            );
        }
    }

    let costs = &detail.costs;
    println!();
    println!("{}:", style("Costs").bold());
    if let Some(ref estimated) = project.estimated_cost {
        println!("  Estimated:   {}", format_cost(estimated, currency));
    }
    if let Some(ref actual) = project.actual_cost {
        println!("  Actual:      {}", format_cost(actual, currency));
    }
    println!("  Parts total: {}", format_currency(costs.parts_total, currency));
    if let Some(variance) = costs.variance {
        let amount = format_currency(variance, currency);
        let variance = if costs.over_budget == Some(true) {
            style(format!("{} over parts total", amount)).red()
        } else {
            style(format!("{} under parts total", amount)).green()
        };
        println!("  Variance:    {}", variance);
    }

    if !project.notes.is_empty() {
        println!();
        println!("{}", style("Notes:").bold());
        println!("{}", project.notes);
    }
    println!("{}", rule());
}

fn field(fields: &[String], index: usize) -> String {
    fields.get(index).cloned().unwrap_or_default()
}

fn run_new(args: NewArgs, session: &Session) -> Result<()> {
    let mut form = ProjectForm::new(today());
    args.fields.apply(&mut form);

    for value in &args.sub_projects {
        let fields = split_fields(value, 2);
        form.sub_projects.append(SubProjectDraft {
            title: field(&fields, 0),
            description: String::new(),
            estimated_hours: field(&fields, 1),
        });
    }
    for value in &args.parts {
        let fields = split_fields(value, 3);
        form.initial_parts.append(PartDraft {
            name: field(&fields, 0),
            category: field(&fields, 1),
            estimated_cost: field(&fields, 2),
            ..Default::default()
        });
    }

    if args.interactive {
        form = FormWizard::new().project(form)?;
    }

    let submission = form.submit()?;

    let catalog = session.catalog.with_project(submission.project.clone());
    let catalog = submission
        .sub_projects
        .iter()
        .cloned()
        .fold(catalog, |c, sub| c.with_sub_project(sub));
    let catalog = submission
        .parts
        .iter()
        .cloned()
        .fold(catalog, |c, part| c.with_part(part));

    let project = &submission.project;
    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&submission, format)? {
        return Ok(());
    }
    match format {
        OutputFormat::Id => println!("{}", project.id),
        OutputFormat::ShortId => println!("{}", display_ref(&catalog.project_refs(), &project.id)),
        _ => {
            print_done(
                "Created",
                "project",
                &display_ref(&catalog.project_refs(), &project.id),
                &project.title,
            );
            println!(
                "   {} → {}, {} sub-project(s), {} part(s)",
                project.start_date,
                project.target_date,
                submission.sub_projects.len(),
                submission.parts.len()
            );
            println!("   {} project(s) in catalog", catalog.projects.len());
            print_not_saved(session.quiet);
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, session: &Session) -> Result<()> {
    let existing = session.catalog.find_project(&args.reference)?;
    let mut form = ProjectForm::from_project(existing);
    args.fields.apply(&mut form);

    if args.interactive {
        form = FormWizard::new().project(form)?;
    }

    let updated = form.submit_edit(existing)?;
    let catalog = session.catalog.replacing_project(updated)?;
    let project = catalog.project(&existing.id)?;

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(project, format)? {
        return Ok(());
    }
    print_done(
        "Updated",
        "project",
        &display_ref(&catalog.project_refs(), &project.id),
        &project.title,
    );
    println!(
        "   {}: {}  {}: {}",
        style("Status").dim(),
        style_project_status(project.status),
        style("Target").dim(),
        project.target_date
    );
    print_not_saved(session.quiet);
    Ok(())
}

fn run_delete(args: DeleteArgs, session: &Session) -> Result<()> {
    let project = session.catalog.find_project(&args.reference)?;
    let reference = display_ref(&session.catalog.project_refs(), &project.id);
    let catalog = session.catalog.without_project(&project.id)?;

    print_done("Deleted", "project", &reference, &project.title);
    println!("   {} project(s) remain", catalog.projects.len());

    let parts = catalog.parts_for(&project.id).len();
    let subs = catalog.sub_projects_for(&project.id).len();
    if (parts > 0 || subs > 0) && !session.quiet {
        println!(
            "   {}",
            style(format!(
                "{} part(s) and {} sub-project(s) still reference {}",
                parts, subs, project.id
            ))
            .yellow()
        );
    }
    print_not_saved(session.quiet);
    Ok(())
}
