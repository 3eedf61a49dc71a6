//! Creation and edit forms with field-level validation
//!
//! A form holds raw user input. `submit()` either builds entities or
//! returns every field error at once; nothing is built while any error
//! remains.

use chrono::{Days, NaiveDate};
use miette::Diagnostic;
use serde::Serialize;
use thiserror::Error;

use crate::core::entity::{PartStatus, ProjectStatus};
use crate::core::identity::EntityId;
use crate::core::money::Cost;
use crate::entities::photo::is_image_filename;
use crate::entities::{Part, Project, SubProject};

/// Part categories offered by the forms
pub const PART_CATEGORIES: &[&str] = &[
    "Frame & Fork",
    "Drivetrain",
    "Braking",
    "Wheels & Tires",
    "Cockpit",
    "Comfort",
    "Accessories",
    "Tools & Supplies",
];

pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MIN: usize = 10;
pub const DESCRIPTION_MAX: usize = 500;

/// Days between the default start and target dates of a new project
pub const DEFAULT_PROJECT_DAYS: u64 = 90;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A validation failure on one field
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{field}: {message}")]
pub struct FieldError {
    /// Field path, e.g. `title` or `initial_parts[1].category`
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// All validation failures of a submission
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{} field(s) need attention", .errors.len())]
#[diagnostic(code(velo::form::invalid), help("Fix the fields above and submit again"))]
pub struct FormErrors {
    #[related]
    pub errors: Vec<FieldError>,
}

impl FormErrors {
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }
}

fn into_result<T>(errors: Vec<FieldError>, value: impl FnOnce() -> T) -> Result<T, FormErrors> {
    if errors.is_empty() {
        Ok(value())
    } else {
        Err(FormErrors { errors })
    }
}

/// An ordered list of repeated field groups with stable keys
///
/// Keys survive removals, so the entry that was `#3` stays `#3` after
/// `#2` is removed.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList<T> {
    entries: Vec<(u32, T)>,
    next_key: u32,
}

impl<T> Default for FieldList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_key: 1,
        }
    }
}

impl<T> FieldList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return its key
    pub fn append(&mut self, value: T) -> u32 {
        let key = self.next_key;
        self.next_key += 1;
        self.entries.push((key, value));
        key
    }

    /// Remove the entry at `index`, if there is one
    pub fn remove(&mut self, index: usize) -> Option<T> {
        if index < self.entries.len() {
            Some(self.entries.remove(index).1)
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index).map(|(_, v)| v)
    }

    pub fn key(&self, index: usize) -> Option<u32> {
        self.entries.get(index).map(|(k, _)| *k)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> FromIterator<T> for FieldList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = Self::new();
        for value in iter {
            list.append(value);
        }
        list
    }
}

// Field checks

fn required(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

fn parse_date(errors: &mut Vec<FieldError>, field: &str, value: &str, label: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, format!("{} is required", label)));
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(
                field,
                format!("{} must be a date in YYYY-MM-DD format", label),
            ));
            None
        }
    }
}

fn parse_optional_date(errors: &mut Vec<FieldError>, field: &str, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, "Dates use YYYY-MM-DD format"));
            None
        }
    }
}

/// Parse an optional non-negative number; blank input means "not given"
fn parse_non_negative(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        Ok(_) => {
            errors.push(FieldError::new(field, message));
            None
        }
        Err(_) => {
            errors.push(FieldError::new(field, "Must be a number"));
            None
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn cost_input(cost: Option<&Cost>) -> String {
    cost.map(Cost::to_input).unwrap_or_default()
}

/// A sub-project entered alongside a new project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubProjectDraft {
    pub title: String,
    pub description: String,
    pub estimated_hours: String,
}

/// A part entered alongside a new project
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartDraft {
    pub name: String,
    pub category: String,
    pub estimated_cost: String,
    pub supplier: String,
    pub notes: String,
}

/// Dates parsed from a project form
struct ProjectDates {
    start: NaiveDate,
    target: NaiveDate,
    work_started: Option<NaiveDate>,
}

/// Project creation/edit form
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub next_step: String,
    pub start_date: String,
    pub target_date: String,
    pub client: String,
    pub estimated_cost: String,
    /// Final cost once known
    pub actual_cost: String,
    pub work_started: String,
    pub notes: String,
    pub sub_projects: FieldList<SubProjectDraft>,
    pub initial_parts: FieldList<PartDraft>,
}

/// Entities built from a valid project form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectSubmission {
    pub project: Project,
    pub sub_projects: Vec<SubProject>,
    pub parts: Vec<Part>,
}

impl ProjectForm {
    /// Blank form: not started, starting `today`, due 90 days later
    pub fn new(today: NaiveDate) -> Self {
        let target = today
            .checked_add_days(Days::new(DEFAULT_PROJECT_DAYS))
            .unwrap_or(today);
        Self {
            title: String::new(),
            description: String::new(),
            status: ProjectStatus::NotStarted,
            next_step: String::new(),
            start_date: today.format(DATE_FORMAT).to_string(),
            target_date: target.format(DATE_FORMAT).to_string(),
            client: String::new(),
            estimated_cost: String::new(),
            actual_cost: String::new(),
            work_started: String::new(),
            notes: String::new(),
            sub_projects: FieldList::new(),
            initial_parts: FieldList::new(),
        }
    }

    /// Edit form pre-filled from an existing project
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
            status: project.status,
            next_step: project.next_step.clone(),
            start_date: project.start_date.format(DATE_FORMAT).to_string(),
            target_date: project.target_date.format(DATE_FORMAT).to_string(),
            client: project.client.clone().unwrap_or_default(),
            estimated_cost: cost_input(project.estimated_cost.as_ref()),
            actual_cost: cost_input(project.actual_cost.as_ref()),
            work_started: project
                .work_started
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            notes: project.notes.clone(),
            sub_projects: FieldList::new(),
            initial_parts: FieldList::new(),
        }
    }

    /// Every field error, in field order
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        self.check(&mut errors, true);
        errors
    }

    /// Run every field check; the description length rule only applies when
    /// `check_description` is set
    fn check(&self, errors: &mut Vec<FieldError>, check_description: bool) -> Option<ProjectDates> {
        required(errors, "title", &self.title, "Project title is required");
        if self.title.chars().count() > TITLE_MAX {
            errors.push(FieldError::new(
                "title",
                format!("Title must be at most {} characters", TITLE_MAX),
            ));
        }

        if check_description {
            let description_len = self.description.chars().count();
            if description_len < DESCRIPTION_MIN {
                errors.push(FieldError::new(
                    "description",
                    format!("Description must be at least {} characters", DESCRIPTION_MIN),
                ));
            } else if description_len > DESCRIPTION_MAX {
                errors.push(FieldError::new(
                    "description",
                    format!("Description must be at most {} characters", DESCRIPTION_MAX),
                ));
            }
        }

        let start = parse_date(errors, "start_date", &self.start_date, "Start date");
        let target = parse_date(errors, "target_date", &self.target_date, "Target completion date");
        let work_started = parse_optional_date(errors, "work_started", &self.work_started);

        for (i, sub) in self.sub_projects.iter().enumerate() {
            let field = |name: &str| format!("sub_projects[{}].{}", i, name);
            required(errors, &field("title"), &sub.title, "Sub-project title is required");
            parse_non_negative(
                errors,
                &field("estimated_hours"),
                &sub.estimated_hours,
                "Hours cannot be negative",
            );
        }

        for (i, part) in self.initial_parts.iter().enumerate() {
            let field = |name: &str| format!("initial_parts[{}].{}", i, name);
            required(errors, &field("name"), &part.name, "Part name is required");
            required(errors, &field("category"), &part.category, "Category is required");
            parse_non_negative(
                errors,
                &field("estimated_cost"),
                &part.estimated_cost,
                "Cost must be positive",
            );
        }

        start.zip(target).map(|(start, target)| ProjectDates {
            start,
            target,
            work_started,
        })
    }

    /// Build a new project with its sub-projects and initial parts
    pub fn submit(&self) -> Result<ProjectSubmission, FormErrors> {
        let mut errors = Vec::new();
        let dates = self.check(&mut errors, true);
        let Some(dates) = dates.filter(|_| errors.is_empty()) else {
            return Err(FormErrors { errors });
        };

        let mut project = Project::new(
            self.title.trim().to_string(),
            self.description.clone(),
            self.status,
            dates.start,
            dates.target,
        );
        self.fill_optional(&mut project, &dates);

        let sub_projects = self
            .sub_projects
            .iter()
            .map(|draft| {
                let mut sub = SubProject::new(project.id.clone(), draft.title.trim().to_string());
                sub.description = draft.description.trim().to_string();
                sub.estimated_hours = draft.estimated_hours.trim().parse().ok();
                sub
            })
            .collect();

        let parts = self
            .initial_parts
            .iter()
            .map(|draft| {
                let mut part = Part::new(project.id.clone(), draft.name.trim().to_string());
                part.category = non_empty(&draft.category);
                part.supplier = draft.supplier.trim().to_string();
                part.notes = draft.notes.trim().to_string();
                if let Ok(amount) = draft.estimated_cost.trim().parse::<f64>() {
                    part.cost = Cost::Amount(amount);
                }
                part
            })
            .collect();

        tracing::debug!(id = %project.id, "project form submitted");
        Ok(ProjectSubmission {
            project,
            sub_projects,
            parts,
        })
    }

    /// Apply the form to an existing project, keeping its id and other fields
    ///
    /// An unchanged description is accepted as is, so projects loaded with a
    /// short or missing description can still be edited.
    pub fn submit_edit(&self, existing: &Project) -> Result<Project, FormErrors> {
        let mut errors = Vec::new();
        let description_changed = self.description != existing.description;
        let dates = self.check(&mut errors, description_changed);
        let Some(dates) = dates.filter(|_| errors.is_empty()) else {
            return Err(FormErrors { errors });
        };

        let mut project = existing.clone();
        project.title = self.title.trim().to_string();
        project.description = self.description.clone();
        project.status = self.status;
        project.start_date = dates.start;
        project.target_date = dates.target;
        self.fill_optional(&mut project, &dates);
        Ok(project)
    }

    fn fill_optional(&self, project: &mut Project, dates: &ProjectDates) {
        project.next_step = self.next_step.trim().to_string();
        project.client = non_empty(&self.client);
        project.estimated_cost = non_empty(&self.estimated_cost).map(|c| Cost::from_input(&c));
        project.actual_cost = non_empty(&self.actual_cost).map(|c| Cost::from_input(&c));
        project.work_started = dates.work_started;
        project.notes = self.notes.trim().to_string();
    }
}

/// Part add/edit form (the parts tracker dialog)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartForm {
    pub name: String,
    pub part_number: String,
    pub description: String,
    pub category: String,
    pub status: PartStatus,
    pub supplier: String,
    /// A plain number or free text such as "$24.99"; unparsable text is kept
    /// and counts as zero
    pub cost: String,
    pub order_date: String,
    pub projected_arrival: String,
    pub received_date: String,
    pub installed_date: String,
    pub notes: String,
}

impl PartForm {
    pub fn from_part(part: &Part) -> Self {
        let date = |d: Option<NaiveDate>| {
            d.map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default()
        };
        Self {
            name: part.name.clone(),
            part_number: part.part_number.clone(),
            description: part.description.clone(),
            category: part.category.clone().unwrap_or_default(),
            status: part.status,
            supplier: part.supplier.clone(),
            cost: part.cost.to_input(),
            order_date: date(part.order_date),
            projected_arrival: date(part.projected_arrival),
            received_date: date(part.received_date),
            installed_date: date(part.installed_date),
            notes: part.notes.clone(),
        }
    }

    /// Build a new part for `project_id`
    pub fn submit(&self, project_id: EntityId) -> Result<Part, FormErrors> {
        self.apply(Part::new(project_id, String::new()))
    }

    /// Apply the form to an existing part, keeping its id and project
    pub fn submit_edit(&self, existing: &Part) -> Result<Part, FormErrors> {
        self.apply(existing.clone())
    }

    fn apply(&self, mut part: Part) -> Result<Part, FormErrors> {
        let mut errors = Vec::new();
        required(&mut errors, "name", &self.name, "Part name is required");
        let order_date = parse_optional_date(&mut errors, "order_date", &self.order_date);
        let projected_arrival =
            parse_optional_date(&mut errors, "projected_arrival", &self.projected_arrival);
        let received_date = parse_optional_date(&mut errors, "received_date", &self.received_date);
        let installed_date = parse_optional_date(&mut errors, "installed_date", &self.installed_date);

        into_result(errors, move || {
            part.name = self.name.trim().to_string();
            part.part_number = self.part_number.trim().to_string();
            part.description = self.description.trim().to_string();
            part.category = non_empty(&self.category);
            part.status = self.status;
            part.supplier = self.supplier.trim().to_string();
            part.cost = Cost::from_input(&self.cost);
            part.order_date = order_date;
            part.projected_arrival = projected_arrival;
            part.received_date = received_date;
            part.installed_date = installed_date;
            part.notes = self.notes.trim().to_string();
            part
        })
    }
}

/// Sub-project add/edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubProjectForm {
    pub title: String,
    pub description: String,
    pub status: ProjectStatus,
    pub estimated_hours: String,
    pub actual_hours: String,
}

impl SubProjectForm {
    pub fn from_sub_project(sub: &SubProject) -> Self {
        let hours = |h: Option<f64>| h.map(|h| h.to_string()).unwrap_or_default();
        Self {
            title: sub.title.clone(),
            description: sub.description.clone(),
            status: sub.status,
            estimated_hours: hours(sub.estimated_hours),
            actual_hours: hours(sub.actual_hours),
        }
    }

    pub fn submit(&self, project_id: EntityId) -> Result<SubProject, FormErrors> {
        self.apply(SubProject::new(project_id, String::new()))
    }

    pub fn submit_edit(&self, existing: &SubProject) -> Result<SubProject, FormErrors> {
        self.apply(existing.clone())
    }

    fn apply(&self, mut sub: SubProject) -> Result<SubProject, FormErrors> {
        let mut errors = Vec::new();
        required(&mut errors, "title", &self.title, "Sub-project title is required");
        let estimated = parse_non_negative(
            &mut errors,
            "estimated_hours",
            &self.estimated_hours,
            "Hours cannot be negative",
        );
        let actual = parse_non_negative(
            &mut errors,
            "actual_hours",
            &self.actual_hours,
            "Hours cannot be negative",
        );

        into_result(errors, move || {
            sub.title = self.title.trim().to_string();
            sub.description = self.description.trim().to_string();
            sub.status = self.status;
            sub.estimated_hours = estimated;
            sub.actual_hours = actual;
            sub
        })
    }
}

/// Reject uploads that are not images
pub fn validate_image_upload(filename: &str) -> Result<(), FieldError> {
    if is_image_filename(filename) {
        Ok(())
    } else {
        Err(FieldError::new(
            "file",
            format!("{} is not a valid image file", filename),
        ))
    }
}
