//! Filter engine: text search, status and category predicates combined with AND
//!
//! Filtering never fails. Absent or unrecognised criteria are treated as
//! "no filter", and the output is always an order-preserving subset of the
//! input.

use std::str::FromStr;

use crate::core::entity::{PartStatus, ProjectStatus};
use crate::entities::{Part, PartRow, Project, SubProject};

/// A criterion value, or the "all" sentinel that disables it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl<T: FromStr> Choice<T> {
    /// Parse user input, treating anything unrecognised as `All`
    ///
    /// Empty input and the literal `all` (any case) are the sentinel.
    pub fn lenient(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Choice::All;
        };
        if raw.eq_ignore_ascii_case("all") {
            return Choice::All;
        }
        match raw.parse::<T>() {
            Ok(value) => Choice::Only(value),
            Err(_) => {
                tracing::warn!(value = raw, "ignoring unrecognised filter value");
                Choice::All
            }
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

/// The active filter predicates for a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria<S> {
    /// Case-insensitive substring searched across the entity's text fields
    pub text: Option<String>,
    pub status: Choice<S>,
    pub category: Choice<String>,
}

impl<S> Default for Criteria<S> {
    fn default() -> Self {
        Self {
            text: None,
            status: Choice::All,
            category: Choice::All,
        }
    }
}

impl<S> Criteria<S> {
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_status(mut self, status: S) -> Self {
        self.status = Choice::Only(status);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Choice::Only(category.into());
        self
    }

    /// True when no predicate would exclude anything
    pub fn is_empty(&self) -> bool {
        self.text.as_deref().map_or(true, str::is_empty)
            && self.status.is_all()
            && self.category.is_all()
    }
}

/// An entity the filter engine can test
pub trait Filterable {
    type Status: Copy + PartialEq;

    /// Text fields searched by the text criterion
    fn search_fields(&self) -> Vec<&str>;

    fn status(&self) -> Self::Status;

    /// Category, for entity types that have one
    fn category(&self) -> Option<&str> {
        None
    }
}

impl Filterable for Project {
    type Status = ProjectStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }
}

impl Filterable for Part {
    type Status = PartStatus;

    /// Name, description, part number and supplier
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.description.as_str(),
            self.part_number.as_str(),
            self.supplier.as_str(),
        ]
    }

    fn status(&self) -> PartStatus {
        self.status
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

impl Filterable for PartRow {
    type Status = PartStatus;

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = self.part.search_fields();
        fields.push(&self.project_title);
        fields
    }

    fn status(&self) -> PartStatus {
        self.part.status
    }

    fn category(&self) -> Option<&str> {
        self.part.category()
    }
}

impl Filterable for SubProject {
    type Status = ProjectStatus;

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }

    fn status(&self) -> ProjectStatus {
        self.status
    }
}

/// Test a single item against every active criterion
pub fn matches<T: Filterable>(item: &T, criteria: &Criteria<T::Status>) -> bool {
    let matches_text = match criteria.text.as_deref() {
        None | Some("") => true,
        Some(needle) => {
            let needle = needle.to_lowercase();
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    };

    let matches_status = match &criteria.status {
        Choice::All => true,
        Choice::Only(status) => item.status() == *status,
    };

    let matches_category = match &criteria.category {
        Choice::All => true,
        Choice::Only(category) => item.category() == Some(category.as_str()),
    };

    matches_text && matches_status && matches_category
}

/// Return the items matching all criteria, in their original order
pub fn filter<T: Filterable + Clone>(items: &[T], criteria: &Criteria<T::Status>) -> Vec<T> {
    let result: Vec<T> = items
        .iter()
        .filter(|item| matches(*item, criteria))
        .cloned()
        .collect();
    tracing::debug!(input = items.len(), output = result.len(), "filter applied");
    result
}
