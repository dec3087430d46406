//! CLI command implementations

pub mod completions;
pub mod config;
pub mod list;
pub mod schema;
pub mod show;
pub mod site;
pub mod validate;
