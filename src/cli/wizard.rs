//! Interactive form wizard
//!
//! Prompts fill the same forms the flag-driven commands build, so both paths
//! go through identical validation on submit.

use console::style;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use miette::{IntoDiagnostic, Result};

use crate::core::entity::{PartStatus, ProjectStatus, StatusSet};
use crate::core::form::{PartDraft, PartForm, ProjectForm, SubProjectDraft, SubProjectForm, PART_CATEGORIES};

pub struct FormWizard {
    theme: ColorfulTheme,
}

impl Default for FormWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWizard {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }

    fn header(&self, what: &str) {
        println!();
        println!("{} {}", style("◆").cyan(), style(what).bold());
        println!("{}", style("─".repeat(50)).dim());
        println!();
    }

    fn text(&self, prompt: &str, initial: &str, required: bool) -> Result<String> {
        let input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(!required);
        let input = if initial.is_empty() {
            input
        } else {
            input.default(initial.to_string())
        };
        input.interact_text().into_diagnostic()
    }

    fn project_status(&self, current: ProjectStatus) -> Result<ProjectStatus> {
        let all = ProjectStatus::all();
        let labels: Vec<&str> = all.iter().map(|s| s.label()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Status")
            .items(&labels)
            .default(all.iter().position(|s| *s == current).unwrap_or(0))
            .interact()
            .into_diagnostic()?;
        Ok(all[selection])
    }

    fn part_status(&self, current: PartStatus) -> Result<PartStatus> {
        let all = PartStatus::all();
        let labels: Vec<&str> = all.iter().map(|s| s.label()).collect();
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Status")
            .items(&labels)
            .default(all.iter().position(|s| *s == current).unwrap_or(0))
            .interact()
            .into_diagnostic()?;
        Ok(all[selection])
    }

    fn category(&self, current: &str) -> Result<String> {
        let selection = Select::with_theme(&self.theme)
            .with_prompt("Category")
            .items(PART_CATEGORIES)
            .default(PART_CATEGORIES.iter().position(|c| *c == current).unwrap_or(0))
            .interact()
            .into_diagnostic()?;
        Ok(PART_CATEGORIES[selection].to_string())
    }

    fn confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact()
            .into_diagnostic()
    }

    /// Fill a project form, starting from `form`
    pub fn project(&self, mut form: ProjectForm) -> Result<ProjectForm> {
        self.header("Project details");
        form.title = self.text("Title", &form.title, true)?;
        form.description = self.text("Description", &form.description, false)?;
        form.status = self.project_status(form.status)?;
        form.next_step = self.text("Next step", &form.next_step, false)?;
        form.start_date = self.text("Start date (YYYY-MM-DD)", &form.start_date, true)?;
        form.target_date = self.text("Target completion (YYYY-MM-DD)", &form.target_date, true)?;
        form.client = self.text("Client", &form.client, false)?;
        form.estimated_cost = self.text("Estimated cost", &form.estimated_cost, false)?;
        form.actual_cost = self.text("Final cost", &form.actual_cost, false)?;
        form.work_started = self.text("Work started (YYYY-MM-DD)", &form.work_started, false)?;
        form.notes = self.text("Notes", &form.notes, false)?;

        while self.confirm("Add a sub-project?")? {
            form.sub_projects.append(SubProjectDraft {
                title: self.text("  Sub-project title", "", true)?,
                description: self.text("  Description", "", false)?,
                estimated_hours: self.text("  Estimated hours", "", false)?,
            });
        }

        while self.confirm("Add an initial part?")? {
            form.initial_parts.append(PartDraft {
                name: self.text("  Part name", "", true)?,
                category: self.category("")?,
                estimated_cost: self.text("  Estimated cost", "", false)?,
                supplier: self.text("  Supplier", "", false)?,
                notes: self.text("  Notes", "", false)?,
            });
        }

        Ok(form)
    }

    pub fn part(&self, mut form: PartForm) -> Result<PartForm> {
        self.header("Part details");
        form.name = self.text("Name", &form.name, true)?;
        form.part_number = self.text("Part number", &form.part_number, false)?;
        form.description = self.text("Description", &form.description, false)?;
        form.category = self.category(&form.category)?;
        form.status = self.part_status(form.status)?;
        form.supplier = self.text("Supplier", &form.supplier, false)?;
        form.cost = self.text("Cost", &form.cost, false)?;
        form.order_date = self.text("Order date (YYYY-MM-DD)", &form.order_date, false)?;
        form.projected_arrival =
            self.text("Projected arrival (YYYY-MM-DD)", &form.projected_arrival, false)?;
        form.notes = self.text("Notes", &form.notes, false)?;
        Ok(form)
    }

    pub fn sub_project(&self, mut form: SubProjectForm) -> Result<SubProjectForm> {
        self.header("Sub-project details");
        form.title = self.text("Title", &form.title, true)?;
        form.description = self.text("Description", &form.description, false)?;
        form.status = self.project_status(form.status)?;
        form.estimated_hours = self.text("Estimated hours", &form.estimated_hours, false)?;
        form.actual_hours = self.text("Actual hours", &form.actual_hours, false)?;
        Ok(form)
    }
}
