//! `velo export` command - Print the whole catalog
//!
//! The YAML output uses the same layout `--catalog` reads, so an export can
//! be edited and loaded back.

use miette::Result;

use crate::cli::commands::utils::print_structured;
use crate::cli::{GlobalOpts, OutputFormat, Session};

#[derive(clap::Args, Debug)]
pub struct ExportArgs {}

pub fn run(_args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let format = match session.format_or(OutputFormat::Yaml) {
        OutputFormat::Json => OutputFormat::Json,
        OutputFormat::Yaml => OutputFormat::Yaml,
        other => {
            return Err(miette::miette!(
                help = "Use --format yaml or --format json",
                "Export does not support the {:?} format",
                other
            ))
        }
    };
    print_structured(&session.catalog, format)?;
    Ok(())
}
