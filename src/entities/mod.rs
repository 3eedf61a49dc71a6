//! Entity type definitions
//!
//! Velo tracks the following entity types:
//!
//! - [`Project`] - A bicycle restoration with status, dates and costs
//! - [`Part`] - A component needed, ordered, received or installed for a project
//! - [`SubProject`] - A phase of work within a project with hour estimates
//! - [`Photo`] - A project gallery image or an inspiration image

pub mod part;
pub mod photo;
pub mod project;
pub mod sub_project;

pub use part::{Part, PartRow};
pub use photo::Photo;
pub use project::Project;
pub use sub_project::SubProject;
