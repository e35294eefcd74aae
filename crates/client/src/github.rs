//! GitHub endpoints: repository contents, raw files and rate limit.

use crate::client::N8nClient;
use crate::error::ClientResult;
use crate::transport::Auth;
use n8n_nodes_core::{directory_names, ContentEntry, RateLimitResponse};
use url::Url;

/// GitHub API scoped to the configured repository.
pub struct GitHubApi<'a> {
    client: &'a N8nClient,
}

impl<'a> GitHubApi<'a> {
    pub(crate) fn new(client: &'a N8nClient) -> Self {
        Self { client }
    }

    /// URL of `GET /repos/{owner}/{repo}/contents/{path}`
    pub fn contents_url(&self, path: &str) -> ClientResult<Url> {
        let github = &self.client.config().github;
        let url = self.client.endpoints().api.join(&format!(
            "repos/{}/{}/contents/{}",
            github.owner, github.repo, path
        ))?;
        Ok(url)
    }

    /// URL of a file on the raw content host, at the configured branch
    pub fn raw_url(&self, path: &str) -> ClientResult<Url> {
        let github = &self.client.config().github;
        let url = self.client.endpoints().raw.join(&format!(
            "{}/{}/{}/{}",
            github.owner, github.repo, github.branch, path
        ))?;
        Ok(url)
    }

    /// List the entries of a repository directory.
    pub async fn list_directory(&self, path: &str) -> ClientResult<Vec<ContentEntry>> {
        let url = self.contents_url(path)?;
        self.client.http.get_json(url, Auth::GitHubApi).await
    }

    /// Names of the sub-directories of a repository directory.
    pub async fn list_subdirectories(&self, path: &str) -> ClientResult<Vec<String>> {
        Ok(directory_names(self.list_directory(path).await?))
    }

    /// Fetch a raw file, returning its URL and text.
    pub async fn fetch_raw(&self, path: &str) -> ClientResult<(Url, String)> {
        let url = self.raw_url(path)?;
        let text = self.client.http.get_text(url.clone(), Auth::GitHubRaw).await?;
        Ok((url, text))
    }

    /// Current core rate-limit window.
    pub async fn rate_limit(&self) -> ClientResult<RateLimitResponse> {
        let url = self.client.endpoints().api.join("rate_limit")?;
        self.client.http.get_json(url, Auth::GitHubApi).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8n_nodes_core::Config;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> N8nClient {
        let mut config = Config::default();
        config.github.api_base = server.uri();
        config.github.raw_base = server.uri();
        N8nClient::new(config).unwrap()
    }

    #[test]
    fn test_urls() {
        let client = N8nClient::new(Config::default()).unwrap();
        let github = client.github();

        assert_eq!(
            github.contents_url("packages/nodes-base/nodes").unwrap().as_str(),
            "https://api.github.com/repos/n8n-io/n8n/contents/packages/nodes-base/nodes"
        );
        assert_eq!(
            github.raw_url("packages/nodes-base/nodes/Slack/Slack.node.ts").unwrap().as_str(),
            "https://raw.githubusercontent.com/n8n-io/n8n/master/packages/nodes-base/nodes/Slack/Slack.node.ts"
        );
    }

    #[tokio::test]
    async fn test_list_subdirectories() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/n8n-io/n8n/contents/packages/nodes-base/nodes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "A", "type": "dir", "path": "packages/nodes-base/nodes/A"},
                {"name": "B", "type": "file", "path": "packages/nodes-base/nodes/B"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let names = client
            .github()
            .list_subdirectories("packages/nodes-base/nodes")
            .await
            .unwrap();

        assert_eq!(names, vec!["A"]);
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resources": {},
                "rate": {"limit": 60, "remaining": 59, "reset": 1700000000}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client.github().rate_limit().await.unwrap();

        assert_eq!(response.rate.limit, Some(60));
        assert_eq!(response.rate.remaining, Some(59));
    }

    #[tokio::test]
    async fn test_fetch_raw_not_found() {
        let server = MockServer::start().await;

        let client = client_for(&server);
        let err = client.github().fetch_raw("missing.ts").await.unwrap_err();

        assert!(err.is_not_found());
    }
}
