//! Core module - fundamental types and the filter/sort/aggregate engines

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod entity;
pub mod filter;
pub mod form;
pub mod identity;
pub mod money;
pub mod shortid;
pub mod sort;

pub use aggregate::{
    completion_rate, cost_summaries, count_by_category, count_by_status, distinct_categories,
    part_totals, total_cost, PartTotals, ProjectCostSummary, StatusCounts,
};
pub use catalog::{Catalog, CatalogError};
pub use config::Config;
pub use entity::{Entity, PartStatus, ProjectStatus, StatusSet};
pub use filter::{filter, Choice, Criteria, Filterable};
pub use form::{FieldError, FieldList, FormErrors, PartForm, ProjectForm, SubProjectForm};
pub use identity::{EntityId, EntityPrefix, IdParseError};
pub use money::{parse_currency, Cost};
pub use shortid::ShortIdIndex;
pub use sort::{sort, PartSortKey, ProjectSortKey, SortDirection, Sortable, SubProjectSortKey};
