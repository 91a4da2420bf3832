//! Mergelink GitLab Client
//!
//! A small, typed HTTP client for the parts of the GitLab REST API (v4)
//! mergelink needs: looking up merge requests and posting notes on them.
//!
//! # Example
//!
//! ```no_run
//! use mergelink_client::GitlabClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = GitlabClient::new("https://gitlab.example.com", "group/app", "glpat-token");
//!
//!     let url = client.merge_request_url("15").await?;
//!     client.create_note("9001", &format!("Build started: {}", url)).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod merge_requests;

pub use error::{ClientError, Result};

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

/// Header GitLab reads personal/project access tokens from
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// HTTP client for one GitLab project
#[derive(Debug, Clone)]
pub struct GitlabClient {
    /// Base URL of the GitLab instance (e.g., "https://gitlab.example.com")
    base_url: String,
    /// Project id or full path, already encoded as a single path segment
    project: String,
    /// API access token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl GitlabClient {
    /// Create a new GitLab client
    ///
    /// # Arguments
    /// * `base_url` - The GitLab instance URL (e.g., "https://gitlab.example.com")
    /// * `project` - Numeric project id or full path ("group/app")
    /// * `token` - Access token with `api` scope
    ///
    /// # Example
    /// ```
    /// use mergelink_client::GitlabClient;
    ///
    /// let client = GitlabClient::new("https://gitlab.example.com/", "group/app", "token");
    /// assert_eq!(client.base_url(), "https://gitlab.example.com");
    /// ```
    pub fn new(base_url: impl Into<String>, project: &str, token: impl Into<String>) -> Self {
        Self::with_client(base_url, project, token, Client::new())
    }

    /// Create a new GitLab client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(
        base_url: impl Into<String>,
        project: &str,
        token: impl Into<String>,
        client: Client,
    ) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            project: urlencoding::encode(project).into_owned(),
            token: token.into(),
            client,
        }
    }

    /// Get the base URL of the GitLab instance
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API URL of the project, e.g. ".../api/v4/projects/group%2Fapp"
    pub fn project_url(&self) -> String {
        format!("{}/api/v4/projects/{}", self.base_url, self.project)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        self.client.get(url).header(TOKEN_HEADER, &self.token)
    }

    fn post(&self, url: &str) -> RequestBuilder {
        self.client.post(url).header(TOKEN_HEADER, &self.token)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is not needed
    async fn handle_empty_response(&self, response: reqwest::Response) -> Result<()> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        Ok(())
    }
}
