// Process-wide configuration, built once at startup and shared read-only

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Errors raised while loading or validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid URL for {field}: {value}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub npm: NpmConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub http: HttpConfig,

    /// Bearer token for GitHub requests. Never read from the file.
    #[serde(skip)]
    pub github_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_raw_base")]
    pub raw_base: String,

    #[serde(default = "default_owner")]
    pub owner: String,

    #[serde(default = "default_repo")]
    pub repo: String,

    #[serde(default = "default_branch")]
    pub branch: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpmConfig {
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Search text sent to the registry, matched as a package-name prefix
    #[serde(default = "default_search_text")]
    pub search_text: String,

    #[serde(default = "default_search_size")]
    pub search_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Number of node names shown before the listing is cut short
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,

    /// Collections that make up the node catalog, primary first
    #[serde(default = "default_sources")]
    pub sources: Vec<NodeSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// A directory in the upstream repository holding one node per sub-directory.
///
/// When `categories` is non-empty, nodes live one level deeper, under
/// `<path>/<category>/<node>`. An `optional` source is best-effort: failing to
/// fetch it never fails the request that aggregates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSource {
    pub label: String,
    pub path: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub optional: bool,
}

impl NodeSource {
    pub fn new(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: path.into(),
            categories: Vec::new(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Directories whose sub-directories are node names, in probe order
    pub fn collection_paths(&self) -> Vec<String> {
        if self.categories.is_empty() {
            vec![self.path.clone()]
        } else {
            self.categories
                .iter()
                .map(|category| format!("{}/{}", self.path, category))
                .collect()
        }
    }

    /// Candidate locations of a node's main source file, in probe order
    pub fn node_file_paths(&self, node_name: &str) -> Vec<String> {
        self.collection_paths()
            .into_iter()
            .map(|dir| format!("{dir}/{node_name}/{node_name}.node.ts"))
            .collect()
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_owner() -> String {
    "n8n-io".to_string()
}

fn default_repo() -> String {
    "n8n".to_string()
}

fn default_branch() -> String {
    "master".to_string()
}

fn default_registry() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_search_text() -> String {
    "n8n-nodes-".to_string()
}

fn default_search_size() -> u32 {
    20
}

fn default_preview_limit() -> usize {
    50
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("n8n-nodes-mcp/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_sources() -> Vec<NodeSource> {
    vec![
        NodeSource::new("nodes-base", "packages/nodes-base/nodes"),
        NodeSource::new("langchain", "packages/@n8n/nodes-langchain/nodes")
            .with_categories([
                "agents",
                "chains",
                "code",
                "document_loaders",
                "embeddings",
                "llms",
                "memory",
                "output_parser",
                "retrievers",
                "text_splitters",
                "tools",
                "vector_store",
            ])
            .optional(),
    ]
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            raw_base: default_raw_base(),
            owner: default_owner(),
            repo: default_repo(),
            branch: default_branch(),
        }
    }
}

impl Default for NpmConfig {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            search_text: default_search_text(),
            search_size: default_search_size(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            preview_limit: default_preview_limit(),
            sources: default_sources(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when the
    /// file does not exist.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let config: Self = if config_path.exists() {
            let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
                path: config_path.display().to_string(),
                source,
            })?;
            Self::from_toml_str(&content).map_err(|e| match e {
                ConfigError::Parse { source, .. } => ConfigError::Parse {
                    path: config_path.display().to_string(),
                    source,
                },
                other => other,
            })?
        } else {
            tracing::info!(
                path = %config_path.display(),
                "Configuration file not found, using defaults"
            );
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Attach the bearer token. Empty strings count as no token.
    pub fn with_github_token(mut self, token: Option<String>) -> Self {
        self.github_token = token.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn has_token(&self) -> bool {
        self.github_token.is_some()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_base_url("github.api_base", &self.github.api_base)?;
        parse_base_url("github.raw_base", &self.github.raw_base)?;
        parse_base_url("npm.registry", &self.npm.registry)?;

        let Some(primary) = self.catalog.sources.first() else {
            return Err(ConfigError::Invalid(
                "catalog.sources must contain at least one source".to_string(),
            ));
        };
        if primary.optional {
            return Err(ConfigError::Invalid(format!(
                "the first catalog source ('{}') is the primary collection and cannot be optional",
                primary.label
            )));
        }

        let mut labels = std::collections::HashSet::new();
        for source in &self.catalog.sources {
            if !labels.insert(source.label.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate catalog source label '{}'",
                    source.label
                )));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "http.timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Parse a base URL so that relative joins append to its path instead of
/// replacing the last segment.
pub fn parse_base_url(field: &'static str, value: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        source,
    })?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
