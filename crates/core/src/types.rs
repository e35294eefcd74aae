use serde::{Deserialize, Serialize};

/// Kind of an entry in a GitHub contents listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Submodule,
    #[serde(other)]
    Other,
}

/// One entry of `GET /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl ContentEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Names of the directory entries in a contents listing, in upstream order
pub fn directory_names(entries: Vec<ContentEntry>) -> Vec<String> {
    entries
        .into_iter()
        .filter(ContentEntry::is_dir)
        .map(|entry| entry.name)
        .collect()
}

/// `GET /rate_limit` response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitResponse {
    #[serde(default)]
    pub rate: RateLimitInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub remaining: Option<u64>,
    /// Unix timestamp (seconds) at which the window resets
    #[serde(default)]
    pub reset: Option<i64>,
}

/// `GET /-/v1/search` response from the npm registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NpmSearchResponse {
    #[serde(default)]
    pub objects: Vec<NpmSearchObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmSearchObject {
    pub package: NpmPackage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmPackage {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Node names contributed by a single catalog source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceListing {
    pub label: String,
    pub nodes: Vec<String>,
}

/// Merged node catalog, sources kept in configured order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeListing {
    pub sources: Vec<SourceListing>,
}

impl NodeListing {
    pub fn push(&mut self, label: impl Into<String>, nodes: Vec<String>) {
        self.sources.push(SourceListing {
            label: label.into(),
            nodes,
        });
    }

    pub fn total(&self) -> usize {
        self.sources.iter().map(|s| s.nodes.len()).sum()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources
            .iter()
            .flat_map(|s| s.nodes.iter().map(String::as_str))
    }

    /// Names containing `keyword`, compared case-insensitively
    pub fn search(&self, keyword: &str) -> Vec<&str> {
        let needle = keyword.to_lowercase();
        self.names()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect()
    }
}

/// A node's main source file as fetched from the raw content host
#[derive(Debug, Clone)]
pub struct NodeFile {
    pub name: String,
    pub source: String,
    pub url: String,
    pub content: String,
}
