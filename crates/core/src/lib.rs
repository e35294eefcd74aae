// Core types and text shaping for the n8n node catalog

pub mod config;
pub mod extract;
pub mod format;
pub mod types;

pub use config::{CatalogConfig, Config, ConfigError, GitHubConfig, HttpConfig, NodeSource, NpmConfig};
pub use types::*;
