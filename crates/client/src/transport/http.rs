//! HTTP transport layer.

use crate::error::{ClientError, ClientResult};
use n8n_nodes_core::HttpConfig;
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

const GITHUB_JSON: &str = "application/vnd.github.v3+json";

/// Which headers an outbound request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// GitHub REST API: versioned Accept header plus the bearer token, if any.
    GitHubApi,
    /// GitHub raw content host: bearer token, if any.
    GitHubRaw,
    /// Third-party registry: no credential is ever sent.
    Public,
}

/// HTTP transport shared by every API wrapper.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    authorization: Option<header::HeaderValue>,
}

impl HttpTransport {
    /// Create a new HTTP transport. The bearer token is only attached to
    /// GitHub requests, never installed as a default header.
    pub fn new(config: &HttpConfig, github_token: Option<&str>) -> ClientResult<Self> {
        let authorization = match github_token {
            Some(token) => {
                let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|_| ClientError::Config("Invalid GitHub token format".to_string()))?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            authorization,
        })
    }

    pub fn has_token(&self) -> bool {
        self.authorization.is_some()
    }

    fn with_auth(&self, request: RequestBuilder, auth: Auth) -> RequestBuilder {
        let request = match auth {
            Auth::GitHubApi => request.header(header::ACCEPT, GITHUB_JSON),
            Auth::GitHubRaw | Auth::Public => request,
        };

        match (&self.authorization, auth) {
            (Some(value), Auth::GitHubApi | Auth::GitHubRaw) => {
                request.header(header::AUTHORIZATION, value.clone())
            }
            _ => request,
        }
    }

    /// Send a request, turning transport failures and non-2xx statuses into errors.
    async fn execute(&self, url: &Url, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        debug!(url = %url, status = status.as_u16(), "Upstream returned error status");
        Err(ClientError::from_response(url.as_str(), status.as_u16(), &body))
    }

    async fn read_body(url: &Url, response: Response) -> ClientResult<String> {
        response.text().await.map_err(|source| ClientError::Request {
            url: url.to_string(),
            source,
        })
    }

    fn decode<T: DeserializeOwned>(url: &Url, body: &str) -> ClientResult<T> {
        serde_json::from_str(body).map_err(|source| ClientError::Json {
            url: url.to_string(),
            source,
        })
    }

    /// Execute a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: Url, auth: Auth) -> ClientResult<T> {
        debug!(url = %url, "GET request");

        let request = self.with_auth(self.client.get(url.clone()), auth);
        let response = self.execute(&url, request).await?;
        let body = Self::read_body(&url, response).await?;
        Self::decode(&url, &body)
    }

    /// Execute a GET request with query parameters and decode the JSON body.
    pub async fn get_json_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        url: Url,
        query: &Q,
        auth: Auth,
    ) -> ClientResult<T> {
        debug!(url = %url, "GET request with query");

        let request = self.with_auth(self.client.get(url.clone()).query(query), auth);
        let response = self.execute(&url, request).await?;
        let body = Self::read_body(&url, response).await?;
        Self::decode(&url, &body)
    }

    /// Execute a GET request and return the body as text.
    pub async fn get_text(&self, url: Url, auth: Auth) -> ClientResult<String> {
        debug!(url = %url, "GET request (text)");

        let request = self.with_auth(self.client.get(url.clone()), auth);
        let response = self.execute(&url, request).await?;
        Self::read_body(&url, response).await
    }
}
