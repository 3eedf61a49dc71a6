//! Entity trait and the status vocabularies shared across entity types

use serde::{Deserialize, Serialize};

use crate::core::identity::EntityId;

/// Common trait for all Velo entities
pub trait Entity {
    /// The entity type prefix (e.g., "PROJ", "PART")
    const PREFIX: &'static str;

    /// Get the entity's unique ID
    fn id(&self) -> &EntityId;

    /// Get the entity's display title (title or name)
    fn title(&self) -> &str;
}

/// A closed set of status values that can be enumerated
///
/// Aggregates use this to report a bucket for every value, including
/// those with no members.
pub trait StatusSet: Copy + Ord + std::fmt::Display + 'static {
    fn all() -> &'static [Self];
}

/// Lifecycle status shared by projects and sub-projects
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
}

impl ProjectStatus {
    /// Kebab-case wire form ("not-started", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "not-started",
            ProjectStatus::InProgress => "in-progress",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
        }
    }

    /// Human-readable label ("Not Started", "In Progress", ...)
    pub fn label(&self) -> &'static str {
        match self {
            ProjectStatus::NotStarted => "Not Started",
            ProjectStatus::InProgress => "In Progress",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::OnHold => "On Hold",
        }
    }
}

impl StatusSet for ProjectStatus {
    fn all() -> &'static [Self] {
        &[
            ProjectStatus::NotStarted,
            ProjectStatus::InProgress,
            ProjectStatus::Completed,
            ProjectStatus::OnHold,
        ]
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "not-started" | "notstarted" => Ok(ProjectStatus::NotStarted),
            "in-progress" | "inprogress" => Ok(ProjectStatus::InProgress),
            "completed" => Ok(ProjectStatus::Completed),
            "on-hold" | "onhold" => Ok(ProjectStatus::OnHold),
            _ => Err(format!("Unknown project status: {}", s)),
        }
    }
}

/// Procurement status of a part
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    #[default]
    Needed,
    Ordered,
    Received,
    Installed,
}

impl PartStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PartStatus::Needed => "needed",
            PartStatus::Ordered => "ordered",
            PartStatus::Received => "received",
            PartStatus::Installed => "installed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PartStatus::Needed => "Needed",
            PartStatus::Ordered => "Ordered",
            PartStatus::Received => "Received",
            PartStatus::Installed => "Installed",
        }
    }
}

impl StatusSet for PartStatus {
    fn all() -> &'static [Self] {
        &[
            PartStatus::Needed,
            PartStatus::Ordered,
            PartStatus::Received,
            PartStatus::Installed,
        ]
    }
}

impl std::fmt::Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PartStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "needed" => Ok(PartStatus::Needed),
            "ordered" => Ok(PartStatus::Ordered),
            "received" => Ok(PartStatus::Received),
            "installed" => Ok(PartStatus::Installed),
            _ => Err(format!("Unknown part status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_status_display_roundtrip() {
        for status in ProjectStatus::all() {
            let parsed: ProjectStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, *status);
        }
    }

    #[test]
    fn test_project_status_accepts_underscores() {
        assert_eq!(
            "not_started".parse::<ProjectStatus>().unwrap(),
            ProjectStatus::NotStarted
        );
        assert_eq!("ON-HOLD".parse::<ProjectStatus>().unwrap(), ProjectStatus::OnHold);
        assert!("finished".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn test_project_status_serializes_kebab_case() {
        let yaml = serde_yml::to_string(&ProjectStatus::InProgress).unwrap();
        assert_eq!(yaml.trim(), "in-progress");
        assert_eq!(ProjectStatus::InProgress.label(), "In Progress");
    }

    #[test]
    fn test_part_status_parse() {
        assert_eq!("Ordered".parse::<PartStatus>().unwrap(), PartStatus::Ordered);
        assert!("lost".parse::<PartStatus>().is_err());
        assert_eq!(PartStatus::all().len(), 4);
    }
}
