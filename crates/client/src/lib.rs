//! # n8n-nodes client
//!
//! Read-only access to the upstream data sources behind the n8n node tools:
//! the n8n GitHub repository (contents API, raw files, rate limit) and the
//! npm registry search API.
//!
//! ```rust,no_run
//! use n8n_nodes_client::{ClientResult, N8nClient};
//! use n8n_nodes_core::Config;
//!
//! # async fn example() -> ClientResult<()> {
//! let client = N8nClient::new(Config::default())?;
//!
//! let listing = client.catalog().list_nodes().await?;
//! println!("{} nodes", listing.total());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod error;
pub mod github;
pub mod npm;
pub mod transport;

pub use catalog::NodeCatalog;
pub use client::N8nClient;
pub use error::{ClientError, ClientResult};
pub use github::GitHubApi;
pub use npm::NpmApi;
