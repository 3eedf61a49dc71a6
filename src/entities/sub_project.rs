//! Sub-project entity type - a phase of work within a project

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, ProjectStatus};
use crate::core::identity::{EntityId, EntityPrefix};

/// A sub-project (e.g., "Frame Restoration", "Wheel Building")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubProject {
    /// Unique identifier
    pub id: EntityId,

    /// Owning project
    pub project_id: EntityId,

    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    #[serde(default)]
    pub status: ProjectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_hours: Option<f64>,
}

impl Entity for SubProject {
    const PREFIX: &'static str = "SUB";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl SubProject {
    /// Create a new not-started sub-project with a generated ID
    pub fn new(project_id: EntityId, title: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Sub),
            project_id,
            title,
            description: String::new(),
            status: ProjectStatus::NotStarted,
            estimated_hours: None,
            actual_hours: None,
        }
    }

    /// Actual minus estimated hours, when both are known
    pub fn hours_variance(&self) -> Option<f64> {
        match (self.estimated_hours, self.actual_hours) {
            (Some(est), Some(act)) => Some(act - est),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_project_variance() {
        let mut sub = SubProject::new(EntityId::from("1"), "Frame Restoration".to_string());
        assert_eq!(sub.hours_variance(), None);

        sub.estimated_hours = Some(8.0);
        sub.actual_hours = Some(10.0);
        assert_eq!(sub.hours_variance(), Some(2.0));
    }

    #[test]
    fn test_sub_project_yaml() {
        let yaml = "id: '2'\nproject_id: '1'\ntitle: Drivetrain Overhaul\nstatus: in-progress\nestimated_hours: 6\n";
        let sub: SubProject = serde_yml::from_str(yaml).unwrap();
        assert_eq!(sub.status, ProjectStatus::InProgress);
        assert_eq!(sub.estimated_hours, Some(6.0));
        assert_eq!(sub.actual_hours, None);
    }
}
