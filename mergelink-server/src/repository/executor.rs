//! Executor repository
//!
//! Talks to the executor API:
//! - Launching a build with a cause attached
//! - Replacing the description of a build

use anyhow::{Context, Result};
use async_trait::async_trait;
use mergelink_bridge::Executor;
use mergelink_core::domain::cause::Cause;
use mergelink_core::dto::build::{LaunchBuild, QueuedBuild, UpdateDescription};
use reqwest::Client;
use uuid::Uuid;

/// Write access to builds the executor already created
#[async_trait]
pub trait BuildRepository: Send + Sync {
    /// Replaces the description shown on the build page
    ///
    /// # Arguments
    /// * `build_id` - The executor's id for the build
    /// * `description` - HTML fragment to display
    async fn update_description(&self, build_id: Uuid, description: &str) -> Result<()>;
}

/// HTTP client for the executor API
pub struct HttpExecutor {
    client: Client,
    executor_url: String,
    job: String,
}

impl HttpExecutor {
    /// Creates a new executor client
    ///
    /// # Arguments
    /// * `executor_url` - Base URL of the executor (e.g., "http://localhost:8080")
    /// * `job` - Job launched for every merge request build
    pub fn new(executor_url: String, job: String) -> Self {
        Self {
            client: Client::new(),
            executor_url: executor_url.trim_end_matches('/').to_string(),
            job,
        }
    }

    fn launch_url(&self) -> String {
        format!("{}/api/jobs/launch", self.executor_url)
    }

    fn description_url(&self, build_id: Uuid) -> String {
        format!("{}/api/jobs/{}/description", self.executor_url, build_id)
    }
}

#[async_trait]
impl Executor for HttpExecutor {
    async fn enqueue(&self, cause: Cause) -> Result<QueuedBuild> {
        let response = self
            .client
            .post(self.launch_url())
            .json(&LaunchBuild {
                job: self.job.clone(),
                cause,
            })
            .send()
            .await
            .context("Failed to reach executor")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Executor refused build of {}: {} - {}", self.job, status, body);
        }

        let queued = response
            .json::<QueuedBuild>()
            .await
            .context("Failed to parse queued build")?;

        Ok(queued)
    }
}

#[async_trait]
impl BuildRepository for HttpExecutor {
    async fn update_description(&self, build_id: Uuid, description: &str) -> Result<()> {
        let response = self
            .client
            .put(self.description_url(build_id))
            .json(&UpdateDescription {
                description: description.to_string(),
            })
            .send()
            .await
            .context("Failed to update build description")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Failed to update build description: {} - {}", status, body);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let executor = HttpExecutor::new("http://localhost:8080/".to_string(), "app".to_string());
        let id = Uuid::nil();

        assert_eq!(executor.launch_url(), "http://localhost:8080/api/jobs/launch");
        assert_eq!(
            executor.description_url(id),
            "http://localhost:8080/api/jobs/00000000-0000-0000-0000-000000000000/description"
        );
    }
}
