//! CLI command implementations

pub mod utils;

pub mod completions;
pub mod config;
pub mod dashboard;
pub mod export;
pub mod part;
pub mod photo;
pub mod project;
pub mod search;
pub mod sub;
