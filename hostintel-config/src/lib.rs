//! Run configuration for the hostintel enrichment unit.
//!
//! Resolves module option overrides and source transport settings from
//! files, environment variables and `.env`, and reports which source won.

pub mod env_file;
pub mod models;

pub use env_file::load_env_file;
pub use models::run::{API_KEY_ENV, CONFIG_JSON_ENV, CONFIG_PATH_ENV};
pub use models::{RunConfig, RunConfigSource, SourceConfig};
