//! `velo sub` command - Sub-projects (phases of work within a project)

use clap::{Subcommand, ValueEnum};
use console::style;
use miette::Result;

use crate::cli::commands::utils::{display_ref, print_done, print_not_saved, print_structured};
use crate::cli::helpers::{format_hours, style_project_status};
use crate::cli::table::{CellValue, ColumnDef, TableConfig, TableFormatter, TableRow};
use crate::cli::wizard::FormWizard;
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::aggregate::count_by_status;
use crate::core::entity::ProjectStatus;
use crate::core::filter::{filter, Choice, Criteria};
use crate::core::form::SubProjectForm;
use crate::core::sort::{sort, SortDirection, SubProjectSortKey};
use crate::entities::SubProject;

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    /// List sub-projects
    List(ListArgs),

    /// Add a sub-project to a project
    New(NewArgs),

    /// Edit a sub-project
    Edit(EditArgs),

    /// Delete a sub-project
    Delete(DeleteArgs),
}

/// Columns to display in list output
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ListColumn {
    Id,
    Title,
    Project,
    Status,
    Estimated,
    Actual,
}

impl ListColumn {
    fn key(self) -> &'static str {
        match self {
            ListColumn::Id => "id",
            ListColumn::Title => "title",
            ListColumn::Project => "project",
            ListColumn::Status => "status",
            ListColumn::Estimated => "estimated",
            ListColumn::Actual => "actual",
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
    ColumnDef::new("title", "TITLE", 30),
    ColumnDef::new("project", "PROJECT", 30),
    ColumnDef::new("status", "STATUS", 13),
    ColumnDef::new("estimated", "EST.", 8),
    ColumnDef::new("actual", "ACTUAL", 8),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only sub-projects of this project (ID, PROJ@N or title fragment)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Search in title and description
    #[arg(long)]
    pub search: Option<String>,

    /// Filter by status (not-started, in-progress, completed, on-hold, all)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Sort by field
    #[arg(long, default_value = "title")]
    pub sort: SubProjectSortKey,

    /// Sort descending
    #[arg(long, short = 'r')]
    pub desc: bool,

    /// Columns to display (can specify multiple)
    #[arg(long, value_delimiter = ',', default_values_t = vec![
        ListColumn::Title,
        ListColumn::Project,
        ListColumn::Status,
        ListColumn::Estimated,
        ListColumn::Actual,
    ])]
    pub columns: Vec<ListColumn>,

    /// Wrap text in columns (mobile-friendly output with specified width)
    #[arg(long, short = 'w')]
    pub wrap: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

/// Sub-project fields settable from flags
#[derive(clap::Args, Debug, Default)]
pub struct SubFields {
    #[arg(long, short = 't')]
    pub title: Option<String>,

    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Status (not-started, in-progress, completed, on-hold)
    #[arg(long, short = 's')]
    pub status: Option<ProjectStatus>,

    /// Estimated hours
    #[arg(long)]
    pub estimated: Option<String>,

    /// Actual hours
    #[arg(long)]
    pub actual: Option<String>,
}

impl SubFields {
    fn apply(&self, form: &mut SubProjectForm) {
        let set = |target: &mut String, value: &Option<String>| {
            if let Some(value) = value {
                *target = value.clone();
            }
        };
        set(&mut form.title, &self.title);
        set(&mut form.description, &self.description);
        set(&mut form.estimated_hours, &self.estimated);
        set(&mut form.actual_hours, &self.actual);
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
    pub fields: SubFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct EditArgs {
    /// Sub-project ID, short ID (SUB@N) or title fragment
    pub reference: String,

    #[command(flatten)]
    pub fields: SubFields,

    /// Interactive mode (prompt for fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct DeleteArgs {
    /// Sub-project ID, short ID (SUB@N) or title fragment
    pub reference: String,
}

/// Run a sub-project subcommand
pub fn run(cmd: SubCommands, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    match cmd {
        SubCommands::List(args) => run_list(args, &session),
        SubCommands::New(args) => run_new(args, &session),
        SubCommands::Edit(args) => run_edit(args, &session),
        SubCommands::Delete(args) => run_delete(args, &session),
    }
}

fn run_list(args: ListArgs, session: &Session) -> Result<()> {
    let catalog = &session.catalog;

    let scope: Vec<SubProject> = match args.project.as_deref() {
        Some(reference) => {
            let project = catalog.find_project(reference)?;
            catalog.sub_projects_for(&project.id).into_iter().cloned().collect()
        }
        None => catalog.sub_projects.clone(),
    };

    let criteria = Criteria {
        text: args.search.clone(),
        status: Choice::lenient(args.status.as_deref()),
        category: Choice::All,
    };
    let direction = if args.desc { SortDirection::Desc } else { SortDirection::Asc };
    let subs = sort(&filter(&scope, &criteria), args.sort, direction);

    if args.count {
        println!("{}", subs.len());
        return Ok(());
    }

    let format = session.format_or(OutputFormat::Tsv);
    if print_structured(&subs, format)? {
        return Ok(());
    }

    if subs.is_empty() {
        println!("No sub-projects found.");
        return Ok(());
    }

    let refs = catalog.sub_project_refs();
    let rows: Vec<TableRow> = subs
        .iter()
        .map(|sub| {
            TableRow::new(sub.id.to_string(), &refs)
                .cell("id", CellValue::Id(sub.id.to_string()))
                .cell("title", CellValue::Text(sub.title.clone()))
                .cell(
                    "project",
                    CellValue::Text(catalog.project_title(&sub.project_id).to_string()),
                )
                .cell("status", CellValue::ProjectStatus(sub.status))
                .cell("estimated", CellValue::Hours(sub.estimated_hours))
                .cell("actual", CellValue::Hours(sub.actual_hours))
        })
        .collect();

    let visible: Vec<&str> = args.columns.iter().map(|c| c.key()).collect();
    TableFormatter::new(COLUMNS, "sub-project", "SUB")
        .with_config(TableConfig::for_list(args.wrap, session.quiet))
        .output(&rows, format, &visible);

    if format == OutputFormat::Tsv && !session.quiet {
        let counts = count_by_status(&scope);
        let estimated: f64 = scope.iter().filter_map(|s| s.estimated_hours).sum();
        let actual: f64 = scope.iter().filter_map(|s| s.actual_hours).sum();
        println!(
            "{} {} of {} completed · {} estimated · {} logged",
            style("Totals:").dim(),
            counts.get(ProjectStatus::Completed),
            counts.total(),
            format_hours(Some(estimated)),
            format_hours(Some(actual))
        );
    }
    Ok(())
}

fn run_new(args: NewArgs, session: &Session) -> Result<()> {
    let project = session.catalog.find_project(&args.project)?;

    let mut form = SubProjectForm::default();
    args.fields.apply(&mut form);
    if args.interactive {
        form = FormWizard::new().sub_project(form)?;
    }

    let sub = form.submit(project.id.clone())?;
    let catalog = session.catalog.with_sub_project(sub.clone());

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(&sub, format)? {
        return Ok(());
    }
    let reference = display_ref(&catalog.sub_project_refs(), &sub.id);
    match format {
        OutputFormat::Id => println!("{}", sub.id),
        OutputFormat::ShortId => println!("{}", reference),
        _ => {
            print_done("Created", "sub-project", &reference, &sub.title);
            println!(
                "   {} for {} · {} sub-project(s) on this project",
                style_project_status(sub.status),
                project.title,
                catalog.sub_projects_for(&project.id).len()
            );
            print_not_saved(session.quiet);
        }
    }
    Ok(())
}

fn run_edit(args: EditArgs, session: &Session) -> Result<()> {
    let existing = session.catalog.find_sub_project(&args.reference)?;
    let mut form = SubProjectForm::from_sub_project(existing);
    args.fields.apply(&mut form);
    if args.interactive {
        form = FormWizard::new().sub_project(form)?;
    }

    let updated = form.submit_edit(existing)?;
    let catalog = session.catalog.replacing_sub_project(updated)?;
    let sub = catalog.sub_project(&existing.id)?;

    let format = session.format_or(OutputFormat::Auto);
    if print_structured(sub, format)? {
        return Ok(());
    }
    print_done(
        "Updated",
        "sub-project",
        &display_ref(&catalog.sub_project_refs(), &sub.id),
        &sub.title,
    );
    println!(
        "   {} · {} / {} est.",
        style_project_status(sub.status),
        format_hours(sub.actual_hours),
        format_hours(sub.estimated_hours)
    );
    if let Some(variance) = sub.hours_variance() {
        if variance > 0.0 {
            println!("   {}", style(format!("{} over estimate", format_hours(Some(variance)))).yellow());
        }
    }
    print_not_saved(session.quiet);
    Ok(())
}

fn run_delete(args: DeleteArgs, session: &Session) -> Result<()> {
    let sub = session.catalog.find_sub_project(&args.reference)?;
    let reference = display_ref(&session.catalog.sub_project_refs(), &sub.id);
    let catalog = session.catalog.without_sub_project(&sub.id)?;

    print_done("Deleted", "sub-project", &reference, &sub.title);
    println!("   {} sub-project(s) remain", catalog.sub_projects.len());
    print_not_saved(session.quiet);
    Ok(())
}
