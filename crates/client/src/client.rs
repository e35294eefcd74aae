//! Main client bundling configuration, endpoints and the HTTP transport.

use crate::catalog::NodeCatalog;
use crate::error::{ClientError, ClientResult};
use crate::github::GitHubApi;
use crate::npm::NpmApi;
use crate::transport::HttpTransport;
use n8n_nodes_core::config::parse_base_url;
use n8n_nodes_core::Config;
use std::sync::Arc;
use url::Url;

/// Base URLs validated once at construction.
#[derive(Debug, Clone)]
pub(crate) struct Endpoints {
    pub api: Url,
    pub raw: Url,
    pub registry: Url,
}

/// Client for every upstream the node tools read from.
///
/// Cheap to clone; clones share the configuration and connection pool.
#[derive(Debug, Clone)]
pub struct N8nClient {
    config: Arc<Config>,
    endpoints: Arc<Endpoints>,
    pub(crate) http: HttpTransport,
}

impl N8nClient {
    /// Create a client from configuration.
    pub fn new(config: Config) -> ClientResult<Self> {
        config
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let endpoints = Endpoints {
            api: parse_base_url("github.api_base", &config.github.api_base)
                .map_err(|e| ClientError::Config(e.to_string()))?,
            raw: parse_base_url("github.raw_base", &config.github.raw_base)
                .map_err(|e| ClientError::Config(e.to_string()))?,
            registry: parse_base_url("npm.registry", &config.npm.registry)
                .map_err(|e| ClientError::Config(e.to_string()))?,
        };

        let http = HttpTransport::new(&config.http, config.github_token.as_deref())?;

        Ok(Self {
            config: Arc::new(config),
            endpoints: Arc::new(endpoints),
            http,
        })
    }

    /// Get the configuration this client was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Whether GitHub requests are authenticated.
    pub fn has_token(&self) -> bool {
        self.http.has_token()
    }

    /// Get the GitHub API.
    pub fn github(&self) -> GitHubApi<'_> {
        GitHubApi::new(self)
    }

    /// Get the npm registry API.
    pub fn npm(&self) -> NpmApi<'_> {
        NpmApi::new(self)
    }

    /// Get the node catalog built from the configured sources.
    pub fn catalog(&self) -> NodeCatalog<'_> {
        NodeCatalog::new(self)
    }
}
