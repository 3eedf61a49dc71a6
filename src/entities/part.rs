//! Part entity type - a component sourced for a project

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, PartStatus};
use crate::core::identity::{EntityId, EntityPrefix};
use crate::core::money::Cost;

/// A part tracked against a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Unique identifier
    pub id: EntityId,

    /// Owning project (back-reference only, never used to mutate it)
    pub project_id: EntityId,

    /// Part name
    pub name: String,

    /// Manufacturer or catalog part number
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub part_number: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Category (e.g., "Drivetrain", "Braking")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Procurement status
    #[serde(default)]
    pub status: PartStatus,

    /// Supplier name, empty while unsourced
    #[serde(default)]
    pub supplier: String,

    /// Cost as a number or currency text
    #[serde(default)]
    pub cost: Cost,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_date: Option<NaiveDate>,

    /// Expected arrival while on order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_arrival: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
}

impl Entity for Part {
    const PREFIX: &'static str = "PART";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn title(&self) -> &str {
        &self.name
    }
}

impl Part {
    /// Create a new needed part with a generated ID
    pub fn new(project_id: EntityId, name: String) -> Self {
        Self {
            id: EntityId::new(EntityPrefix::Part),
            project_id,
            name,
            part_number: String::new(),
            description: String::new(),
            category: None,
            status: PartStatus::Needed,
            supplier: String::new(),
            cost: Cost::default(),
            order_date: None,
            projected_arrival: None,
            received_date: None,
            installed_date: None,
            notes: String::new(),
        }
    }

    /// Expected arrival date, shown only while the part has not arrived
    pub fn expected_arrival(&self) -> Option<NaiveDate> {
        if self.received_date.is_some() {
            None
        } else {
            self.projected_arrival
        }
    }
}

/// A part joined with its owning project's title, for cross-project listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartRow {
    #[serde(flatten)]
    pub part: Part,
    pub project_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_defaults() {
        let part = Part::new(EntityId::from("1"), "Chain".to_string());
        assert_eq!(part.status, PartStatus::Needed);
        assert!(part.id.to_string().starts_with("PART-"));
        assert!(part.cost.is_blank());
    }

    #[test]
    fn test_part_deserializes_text_and_numeric_cost() {
        let yaml = r#"
id: "1"
project_id: "1"
name: Brake Cable Set
status: received
supplier: Bike Shop Supply
cost: "$24.99"
order_date: 2024-01-22
received_date: 2024-01-25
"#;
        let part: Part = serde_yml::from_str(yaml).unwrap();
        assert_eq!(part.status, PartStatus::Received);
        assert_eq!(part.cost.amount(), Some(24.99));

        let numeric: Part =
            serde_yml::from_str("id: '2'\nproject_id: '1'\nname: Crankset\ncost: 450.0\n").unwrap();
        assert_eq!(numeric.cost.amount(), Some(450.0));
    }

    #[test]
    fn test_expected_arrival_hidden_once_received() {
        let mut part = Part::new(EntityId::from("1"), "Tires".to_string());
        part.projected_arrival = NaiveDate::from_ymd_opt(2024, 1, 30);
        assert!(part.expected_arrival().is_some());

        part.received_date = NaiveDate::from_ymd_opt(2024, 1, 29);
        assert!(part.expected_arrival().is_none());
    }

    #[test]
    fn test_part_row_flattens() {
        let part = Part::new(EntityId::from("1"), "Stem".to_string());
        let row = PartRow {
            part,
            project_title: "1972 Colnago Super".to_string(),
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["name"], "Stem");
        assert_eq!(json["project_title"], "1972 Colnago Super");
    }
}
