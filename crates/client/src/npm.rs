//! npm registry search.

use crate::client::N8nClient;
use crate::error::ClientResult;
use crate::transport::Auth;
use n8n_nodes_core::NpmSearchResponse;

/// npm registry API.
pub struct NpmApi<'a> {
    client: &'a N8nClient,
}

impl<'a> NpmApi<'a> {
    pub(crate) fn new(client: &'a N8nClient) -> Self {
        Self { client }
    }

    /// `GET /-/v1/search?text=<text>&size=<size>`
    pub async fn search(&self, text: &str, size: u32) -> ClientResult<NpmSearchResponse> {
        let url = self.client.endpoints().registry.join("-/v1/search")?;
        let size = size.to_string();
        self.client
            .http
            .get_json_with_query(url, &[("text", text), ("size", size.as_str())], Auth::Public)
            .await
    }

    /// Search with the configured community-package prefix and page size.
    pub async fn community_packages(&self) -> ClientResult<NpmSearchResponse> {
        let npm = &self.client.config().npm;
        self.search(&npm.search_text, npm.search_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8n_nodes_core::Config;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_community_packages_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/-/v1/search"))
            .and(query_param("text", "n8n-nodes-"))
            .and(query_param("size", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "objects": [
                    {"package": {"name": "n8n-nodes-foo", "version": "0.1.0"}, "score": {}}
                ],
                "total": 1
            })))
            .mount(&server)
            .await;

        let mut config = Config::default();
        config.npm.registry = server.uri();
        let client = N8nClient::new(config).unwrap();

        let response = client.npm().community_packages().await.unwrap();
        assert_eq!(response.objects.len(), 1);
        assert_eq!(response.objects[0].package.name, "n8n-nodes-foo");
        assert!(response.objects[0].package.description.is_none());
    }
}
