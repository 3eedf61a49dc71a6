//! Project entity type - one bicycle restoration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, ProjectStatus};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::money::Cost;

/// A restoration project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique identifier
    pub id: EntityId,

    /// Short title, usually make, model and year
    pub title: String,

    /// Restoration scope, condition and goals
    #[serde(default)]
    pub description: String,

    /// Current status
    #[serde(default)]
    pub status: ProjectStatus,

    /// The next concrete piece of work
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub next_step: String,

    /// Planned start date
    pub start_date: NaiveDate,

    /// Target completion date
    pub target_date: NaiveDate,

    /// Date hands-on work actually began
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_started: Option<NaiveDate>,

    /// Hero image reference (path or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Owner of the bike, when restoring for someone else
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,

    /// Budgeted cost
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_cost: Option<Cost>,

    /// Final cost once known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_cost: Option<Cost>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Entity for Project {
    const PREFIX: &'static str = "PROJ";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }
}

impl Project {
    /// Create a new project with a generated ID
    pub fn new(
        title: String,
        description: String,
        status: ProjectStatus,
        start_date: NaiveDate,
        target_date: NaiveDate,
    ) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Proj),
            title,
            description,
            status,
            next_step: String::new(),
            start_date,
            target_date,
            work_started: None,
            image: None,
            client: None,
            estimated_cost: None,
            actual_cost: None,
            notes: String::new(),
        }
    }

    /// Days from `today` until the target date (negative when overdue)
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        (self.target_date - today).num_days()
    }

    /// Past its target date and not completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != ProjectStatus::Completed && self.target_date < today
    }
}
