//! Node catalog assembled from the configured repository sources.
//!
//! Listing fans out over every source (and every category of a categorized
//! source) concurrently, then merges results in configured order. Failures of
//! optional sources are logged and contribute nothing; failures of required
//! sources fail the whole listing.
//!
//! Looking a node up probes an ordered list of candidate file locations and
//! stops at the first one that exists.

use crate::client::N8nClient;
use crate::error::ClientResult;
use futures::future::join_all;
use n8n_nodes_core::{NodeFile, NodeListing, NodeSource};
use tracing::{debug, warn};

/// One place a node's source file may live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub source: String,
    pub path: String,
    pub optional: bool,
}

/// Catalog view over the configured node sources.
pub struct NodeCatalog<'a> {
    client: &'a N8nClient,
}

impl<'a> NodeCatalog<'a> {
    pub(crate) fn new(client: &'a N8nClient) -> Self {
        Self { client }
    }

    fn sources(&self) -> &'a [NodeSource] {
        &self.client.config().catalog.sources
    }

    /// Every node of every source, primary first.
    pub async fn list_nodes(&self) -> ClientResult<NodeListing> {
        let sources = self.sources();
        let results = join_all(sources.iter().map(|source| self.list_source(source))).await;

        let mut listing = NodeListing::default();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(nodes) => listing.push(source.label.clone(), nodes),
                Err(e) if source.optional => {
                    warn!(source = %source.label, error = %e, "Skipping unavailable optional source");
                    listing.push(source.label.clone(), Vec::new());
                }
                Err(e) => return Err(e),
            }
        }
        Ok(listing)
    }

    /// Nodes of a single source. For a categorized optional source a failing
    /// category is skipped; for a required one it fails the source.
    pub async fn list_source(&self, source: &NodeSource) -> ClientResult<Vec<String>> {
        let github = self.client.github();
        let collections = source.collection_paths();
        let results = join_all(
            collections
                .iter()
                .map(|collection| github.list_subdirectories(collection)),
        )
        .await;

        let mut nodes = Vec::new();
        for (collection, result) in collections.iter().zip(results) {
            match result {
                Ok(names) => nodes.extend(names),
                Err(e) if source.optional => {
                    debug!(collection = %collection, error = %e, "Skipping unavailable collection");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(nodes)
    }

    /// Candidate file locations for a node, in probe order.
    pub fn candidates(&self, node_name: &str) -> Vec<Candidate> {
        self.sources()
            .iter()
            .flat_map(|source| {
                source
                    .node_file_paths(node_name)
                    .into_iter()
                    .map(move |path| Candidate {
                        source: source.label.clone(),
                        path,
                        optional: source.optional,
                    })
            })
            .collect()
    }

    /// Fetch a node's main source file. The first candidate that exists wins;
    /// `None` means every candidate is absent upstream.
    pub async fn find_node_file(&self, node_name: &str) -> ClientResult<Option<NodeFile>> {
        let github = self.client.github();

        for candidate in self.candidates(node_name) {
            match github.fetch_raw(&candidate.path).await {
                Ok((url, content)) => {
                    debug!(node = node_name, source = %candidate.source, "Found node file");
                    return Ok(Some(NodeFile {
                        name: node_name.to_string(),
                        source: candidate.source,
                        url: url.to_string(),
                        content,
                    }));
                }
                Err(e) if e.is_not_found() => {
                    debug!(path = %candidate.path, "Node file not at candidate location");
                }
                Err(e) if candidate.optional => {
                    warn!(path = %candidate.path, error = %e, "Skipping unavailable optional candidate");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }
}
