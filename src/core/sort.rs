//! Sort engine: stable, key-dispatched ordering of entity lists

use chrono::NaiveDate;
use clap::ValueEnum;
use std::cmp::Ordering;

use crate::entities::{Part, PartRow, Project, SubProject};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// A field value extracted for comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    /// Compared by code point, no locale rules
    Text(&'a str),
    /// Compared as a calendar date; missing dates sort first
    Date(Option<NaiveDate>),
    /// Compared numerically; missing numbers sort first
    Number(Option<f64>),
}

impl SortValue<'_> {
    /// Compare two values of the same kind; mismatched kinds compare equal
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Date(a), SortValue::Date(b)) => a.cmp(b),
            (SortValue::Number(a), SortValue::Number(b)) => match (a, b) {
                (Some(x), Some(y)) => x.total_cmp(y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            _ => Ordering::Equal,
        }
    }
}

/// An entity that can be ordered by one of its fields
pub trait Sortable {
    type Key: Copy;

    fn sort_value(&self, key: Self::Key) -> SortValue<'_>;
}

/// Sort keys for projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProjectSortKey {
    #[default]
    Title,
    Status,
    StartDate,
    TargetDate,
}

/// Sort keys for parts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum PartSortKey {
    #[default]
    Name,
    Status,
    Category,
    Supplier,
    Cost,
    OrderDate,
    /// Owning project (title when listed across projects)
    Project,
}

/// Sort keys for sub-projects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SubProjectSortKey {
    #[default]
    Title,
    Status,
    EstimatedHours,
    ActualHours,
}

impl Sortable for Project {
    type Key = ProjectSortKey;

    fn sort_value(&self, key: ProjectSortKey) -> SortValue<'_> {
        match key {
            ProjectSortKey::Title => SortValue::Text(&self.title),
            ProjectSortKey::Status => SortValue::Text(self.status.as_str()),
            ProjectSortKey::StartDate => SortValue::Date(Some(self.start_date)),
            ProjectSortKey::TargetDate => SortValue::Date(Some(self.target_date)),
        }
    }
}

impl Sortable for Part {
    type Key = PartSortKey;

    fn sort_value(&self, key: PartSortKey) -> SortValue<'_> {
        match key {
            PartSortKey::Name => SortValue::Text(&self.name),
            PartSortKey::Status => SortValue::Text(self.status.as_str()),
            PartSortKey::Category => SortValue::Text(self.category.as_deref().unwrap_or("")),
            PartSortKey::Supplier => SortValue::Text(&self.supplier),
            PartSortKey::Cost => SortValue::Number(self.cost.amount()),
            PartSortKey::OrderDate => SortValue::Date(self.order_date),
            PartSortKey::Project => SortValue::Text(self.project_id.as_str()),
        }
    }
}

impl Sortable for PartRow {
    type Key = PartSortKey;

    fn sort_value(&self, key: PartSortKey) -> SortValue<'_> {
        match key {
            PartSortKey::Project => SortValue::Text(&self.project_title),
            other => self.part.sort_value(other),
        }
    }
}

impl Sortable for SubProject {
    type Key = SubProjectSortKey;

    fn sort_value(&self, key: SubProjectSortKey) -> SortValue<'_> {
        match key {
            SubProjectSortKey::Title => SortValue::Text(&self.title),
            SubProjectSortKey::Status => SortValue::Text(self.status.as_str()),
            SubProjectSortKey::EstimatedHours => SortValue::Number(self.estimated_hours),
            SubProjectSortKey::ActualHours => SortValue::Number(self.actual_hours),
        }
    }
}

/// Return a sorted copy of `items`
///
/// The sort is stable in both directions: descending reverses the
/// comparator, not the output, so equal elements keep their input order.
pub fn sort<T: Sortable + Clone>(items: &[T], key: T::Key, direction: SortDirection) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| direction.apply(a.sort_value(key).compare(&b.sort_value(key))));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::{PartStatus, ProjectStatus};
    use crate::core::identity::EntityId;
    use crate::core::money::Cost;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn project(id: &str, title: &str, status: ProjectStatus, target: &str) -> Project {
        let mut p = Project::new(
            title.to_string(),
            String::new(),
            status,
            date("2024-01-01"),
            date(target),
        );
        p.id = EntityId::from(id);
        p
    }

    fn ids(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_target_date_ascending() {
        let projects = vec![
            project("1", "Trek", ProjectStatus::InProgress, "2024-03-15"),
            project("3", "Peugeot", ProjectStatus::Completed, "2024-01-30"),
        ];
        let sorted = sort(&projects, ProjectSortKey::TargetDate, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["3", "1"]);
    }

    #[test]
    fn test_dates_compare_as_dates() {
        // "2024-10-01" < "2024-9-30" as strings, but not as dates
        let projects = vec![
            project("a", "A", ProjectStatus::NotStarted, "2024-10-01"),
            project("b", "B", ProjectStatus::NotStarted, "2024-09-30"),
        ];
        let sorted = sort(&projects, ProjectSortKey::TargetDate, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn test_text_is_code_point_order() {
        let projects = vec![
            project("1", "schwinn", ProjectStatus::NotStarted, "2024-01-01"),
            project("2", "Trek", ProjectStatus::NotStarted, "2024-01-01"),
            project("3", "1970s Schwinn", ProjectStatus::NotStarted, "2024-01-01"),
        ];
        let sorted = sort(&projects, ProjectSortKey::Title, SortDirection::Asc);
        assert_eq!(ids(&sorted), vec!["3", "2", "1"]);
    }

    #[test]
    fn test_stable_in_both_directions() {
        let projects = vec![
            project("1", "A", ProjectStatus::InProgress, "2024-01-01"),
            project("2", "B", ProjectStatus::Completed, "2024-01-01"),
            project("3", "C", ProjectStatus::InProgress, "2024-01-01"),
            project("4", "D", ProjectStatus::Completed, "2024-01-01"),
        ];

        let asc = sort(&projects, ProjectSortKey::Status, SortDirection::Asc);
        assert_eq!(ids(&asc), vec!["2", "4", "1", "3"]);

        // Groups swap, members keep input order
        let desc = sort(&projects, ProjectSortKey::Status, SortDirection::Desc);
        assert_eq!(ids(&desc), vec!["1", "3", "2", "4"]);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let projects = vec![
            project("1", "Trek", ProjectStatus::InProgress, "2024-03-15"),
            project("2", "Rockhopper", ProjectStatus::NotStarted, "2024-04-30"),
            project("3", "Peugeot", ProjectStatus::Completed, "2024-01-30"),
            project("4", "Fixed Gear", ProjectStatus::OnHold, "2024-03-01"),
        ];
        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let once = sort(&projects, ProjectSortKey::TargetDate, direction);
            let twice = sort(&once, ProjectSortKey::TargetDate, direction);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_part_cost_sort_handles_unparsable() {
        let mut cheap = Part::new(EntityId::from("1"), "Cable".to_string());
        cheap.id = EntityId::from("cheap");
        cheap.cost = Cost::from("$24.99");
        let mut unknown = Part::new(EntityId::from("1"), "Tape".to_string());
        unknown.id = EntityId::from("unknown");
        unknown.cost = Cost::from("TBD");
        let mut dear = Part::new(EntityId::from("1"), "Wheels".to_string());
        dear.id = EntityId::from("dear");
        dear.cost = Cost::Amount(450.0);
        dear.status = PartStatus::Ordered;

        let sorted = sort(&[dear, cheap, unknown], PartSortKey::Cost, SortDirection::Asc);
        let ids: Vec<&str> = sorted.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["unknown", "cheap", "dear"]);
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggled(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
