//! Error types for upstream requests.

use serde::Deserialize;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Error types that can occur while talking to GitHub or npm.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The upstream API answered with a non-success status.
    #[error("{url} returned status {status}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// The response body was not the JSON shape we expected.
    #[error("malformed JSON from {url}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    /// Whether the upstream reported that the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    /// Create an API error from a status code and response body.
    pub fn from_response(url: &str, status: u16, body: &str) -> Self {
        // GitHub error bodies look like {"message": "...", "documentation_url": "..."}
        let message = match serde_json::from_str::<ErrorResponse>(body) {
            Ok(error_response) => error_response.message,
            Err(_) => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    "empty response body".to_string()
                } else {
                    trimmed.chars().take(MAX_BODY_CHARS).collect()
                }
            }
        };

        Self::Api {
            url: url.to_string(),
            status,
            message,
        }
    }
}

const MAX_BODY_CHARS: usize = 200;

/// Error body returned by the GitHub API.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}
