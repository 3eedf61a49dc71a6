//! Aggregates over an unfiltered collection: status counts, categories, costs
//!
//! Callers pass the full list, not the filtered view, so the counts shown
//! next to a filtered listing describe the whole catalog.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::core::entity::{PartStatus, ProjectStatus, StatusSet};
use crate::core::filter::Filterable;
use crate::core::identity::EntityId;
use crate::core::money::Cost;
use crate::entities::{Part, PartRow, Project};

/// Per-status member counts with a bucket for every status value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCounts<S: StatusSet> {
    buckets: Vec<(S, usize)>,
}

impl<S: StatusSet> StatusCounts<S> {
    /// All buckets at zero
    pub fn zeroed() -> Self {
        Self {
            buckets: S::all().iter().map(|s| (*s, 0)).collect(),
        }
    }

    pub fn get(&self, status: S) -> usize {
        self.buckets
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }

    /// Sum of all buckets
    pub fn total(&self) -> usize {
        self.buckets.iter().map(|(_, n)| n).sum()
    }

    /// Buckets in the status set's declared order
    pub fn iter(&self) -> impl Iterator<Item = (S, usize)> + '_ {
        self.buckets.iter().copied()
    }

    fn increment(&mut self, status: S) {
        if let Some((_, n)) = self.buckets.iter_mut().find(|(s, _)| *s == status) {
            *n += 1;
        }
    }
}

impl<S: StatusSet> Serialize for StatusCounts<S> {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error> {
        let mut map = serializer.serialize_map(Some(self.buckets.len()))?;
        for (status, count) in &self.buckets {
            map.serialize_entry(&status.to_string(), count)?;
        }
        map.end()
    }
}

/// Count items per status
pub fn count_by_status<T>(items: &[T]) -> StatusCounts<T::Status>
where
    T: Filterable,
    T::Status: StatusSet,
{
    let mut counts = StatusCounts::zeroed();
    for item in items {
        counts.increment(item.status());
    }
    counts
}

/// Count items per category in first-seen order; uncategorised items are skipped
pub fn count_by_category<T: Filterable>(items: &[T]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for category in items.iter().filter_map(|item| item.category()) {
        match counts.iter_mut().find(|(c, _)| c == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category.to_string(), 1)),
        }
    }
    counts
}

/// Distinct categories in first-seen order (the category filter choices)
pub fn distinct_categories<T: Filterable>(items: &[T]) -> Vec<String> {
    count_by_category(items)
        .into_iter()
        .map(|(category, _)| category)
        .collect()
}

/// Something with a cost
pub trait Costed {
    fn cost(&self) -> &Cost;
}

impl Costed for Part {
    fn cost(&self) -> &Cost {
        &self.cost
    }
}

impl Costed for PartRow {
    fn cost(&self) -> &Cost {
        &self.part.cost
    }
}

/// Sum of parseable costs; text that does not parse counts as zero
pub fn total_cost<T: Costed>(items: &[T]) -> f64 {
    items.iter().map(|item| item.cost().amount_or_zero()).sum()
}

/// Completed share of projects as a whole percentage, 0 when there are none
pub fn completion_rate(counts: &StatusCounts<ProjectStatus>) -> u32 {
    let total = counts.total();
    if total == 0 {
        return 0;
    }
    let completed = counts.get(ProjectStatus::Completed) as f64;
    (completed / total as f64 * 100.0).round() as u32
}

/// Part totals shown alongside a parts listing
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PartTotals {
    pub count: usize,
    pub total_value: f64,
    pub on_order: usize,
    pub installed: usize,
}

pub fn part_totals<T: Costed + Filterable<Status = PartStatus>>(items: &[T]) -> PartTotals {
    let counts = count_by_status(items);
    PartTotals {
        count: items.len(),
        total_value: total_cost(items),
        on_order: counts.get(PartStatus::Ordered),
        installed: counts.get(PartStatus::Installed),
    }
}

/// Cost picture for one project
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ProjectCostSummary {
    pub project_id: EntityId,
    pub title: String,
    /// Sum of the project's part costs
    pub parts_total: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<f64>,
    /// |actual - parts total|, when an actual cost is recorded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Whether the actual cost exceeds the parts total
    #[serde(skip_serializing_if = "Option::is_none")]
    pub over_budget: Option<bool>,
}

impl ProjectCostSummary {
    pub fn for_project(project: &Project, parts: &[Part]) -> Self {
        let own: Vec<&Part> = parts
            .iter()
            .filter(|part| part.project_id == project.id)
            .collect();
        let parts_total = own.iter().map(|part| part.cost.amount_or_zero()).sum();
        let actual = project.actual_cost.as_ref().and_then(Cost::amount);

        Self {
            project_id: project.id.clone(),
            title: project.title.clone(),
            parts_total,
            estimated: project.estimated_cost.as_ref().and_then(Cost::amount),
            actual,
            variance: actual.map(|a| (a - parts_total).abs()),
            over_budget: actual.map(|a| a > parts_total),
        }
    }
}

/// Headline cost figures across every project
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CostTotals {
    /// Value of every part in the catalog
    pub parts_value: f64,
    /// Sum of the per-project parts totals
    pub parts_total: f64,
    /// Sum of the recorded final costs
    pub final_total: f64,
}

pub fn cost_totals<T: Costed>(parts: &[T], summaries: &[ProjectCostSummary]) -> CostTotals {
    CostTotals {
        parts_value: total_cost(parts),
        parts_total: summaries.iter().map(|s| s.parts_total).sum(),
        final_total: summaries.iter().filter_map(|s| s.actual).sum(),
    }
}

/// One cost summary per project, in project order
pub fn cost_summaries(projects: &[Project], parts: &[Part]) -> Vec<ProjectCostSummary> {
    let summaries: Vec<ProjectCostSummary> = projects
        .iter()
        .map(|project| ProjectCostSummary::for_project(project, parts))
        .collect();
    tracing::debug!(projects = summaries.len(), "computed cost summaries");
    summaries
}
