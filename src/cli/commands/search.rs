//! `velo search` command - Text search across projects, parts and sub-projects

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::commands::utils::{display_ref, print_structured};
use crate::cli::helpers::{style_part_status, style_project_status};
use crate::cli::{GlobalOpts, OutputFormat, Session};
use crate::core::filter::{filter, Criteria};
use crate::core::Catalog;
use crate::entities::{PartRow, Project, SubProject};

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Text to look for (case-insensitive)
    pub term: String,

    /// Show only the number of matches
    #[arg(long)]
    pub count: bool,
}

#[derive(Serialize)]
struct SearchResults {
    projects: Vec<Project>,
    parts: Vec<PartRow>,
    sub_projects: Vec<SubProject>,
}

impl SearchResults {
    fn find(catalog: &Catalog, term: &str) -> Self {
        Self {
            projects: filter(&catalog.projects, &Criteria::default().with_text(term)),
            parts: filter(&catalog.part_rows(), &Criteria::default().with_text(term)),
            sub_projects: filter(&catalog.sub_projects, &Criteria::default().with_text(term)),
        }
    }

    fn len(&self) -> usize {
        self.projects.len() + self.parts.len() + self.sub_projects.len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let catalog = &session.catalog;
    let results = SearchResults::find(catalog, &args.term);

    if args.count {
        println!("{}", results.len());
        return Ok(());
    }

    if print_structured(&results, session.format_or(OutputFormat::Auto))? {
        return Ok(());
    }

    if results.is_empty() {
        println!("No matches for '{}'.", args.term);
        return Ok(());
    }

    if !results.projects.is_empty() {
        let refs = catalog.project_refs();
        println!("{} ({})", style("Projects").bold(), results.projects.len());
        for project in &results.projects {
            println!(
                "  {:<8} {} [{}]",
                style(display_ref(&refs, &project.id)).cyan(),
                project.title,
                style_project_status(project.status)
            );
        }
        println!();
    }

    if !results.parts.is_empty() {
        let refs = catalog.part_refs();
        println!("{} ({})", style("Parts").bold(), results.parts.len());
        for row in &results.parts {
            println!(
                "  {:<8} {} [{}] {}",
                style(display_ref(&refs, &row.part.id)).cyan(),
                row.part.name,
                style_part_status(row.part.status),
                style(&row.project_title).dim()
            );
        }
        println!();
    }

    if !results.sub_projects.is_empty() {
        let refs = catalog.sub_project_refs();
        println!("{} ({})", style("Sub-projects").bold(), results.sub_projects.len());
        for sub in &results.sub_projects {
            println!(
                "  {:<8} {} [{}] {}",
                style(display_ref(&refs, &sub.id)).cyan(),
                sub.title,
                style_project_status(sub.status),
                style(catalog.project_title(&sub.project_id)).dim()
            );
        }
        println!();
    }

    if !session.quiet {
        println!("{} match(es) for '{}'", style(results.len()).cyan(), args.term);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_spans_entity_types() {
        let catalog = Catalog::sample().unwrap();
        let results = SearchResults::find(&catalog, "frame");
        // projects 2 and 4 by description, sub-project 1 by title
        assert!(results.projects.iter().any(|p| p.id.as_str() == "2"));
        assert!(results.sub_projects.iter().any(|s| s.title == "Frame Restoration"));
        assert!(results.parts.is_empty());
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_search_no_matches() {
        let catalog = Catalog::sample().unwrap();
        assert_eq!(SearchResults::find(&catalog, "tandem").len(), 0);
    }
}
