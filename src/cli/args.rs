//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    completions::CompletionsArgs, config::ConfigCommands, dashboard::DashboardArgs,
    export::ExportArgs, part::PartCommands, photo::PhotoCommands, project::ProjectCommands,
    search::SearchArgs, sub::SubCommands,
};

#[derive(Parser)]
#[command(name = "velo")]
#[command(author, version, about = "Bicycle restoration project tracker")]
#[command(long_about = "Track restoration projects, the parts they need, phases of work and photos from the command line.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Catalog file to load (default: built-in sample catalog)
    #[arg(long, global = true, value_name = "FILE")]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the workshop dashboard
    Dashboard(DashboardArgs),

    /// Restoration project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Parts tracker
    #[command(subcommand)]
    Part(PartCommands),

    /// Sub-project (phase of work) management
    #[command(subcommand)]
    Sub(SubCommands),

    /// Project galleries and inspiration photos
    #[command(subcommand)]
    Photo(PhotoCommands),

    /// Search projects, parts and sub-projects
    Search(SearchArgs),

    /// Print the whole catalog
    Export(ExportArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (pretty for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
    /// Just short references (PROJ@N), one per line
    ShortId,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}
