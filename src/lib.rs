//! Velo: a workshop tracker for bicycle restoration projects
//!
//! Projects, the parts sourced for them, sub-project work phases and
//! photos live in a catalog. The filter, sort and aggregate engines in
//! [`core`] turn that catalog into the views the `velo` command prints.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
