//! Review system seam
//!
//! Looks up merge requests and posts notes on them. The GitLab client is
//! the production implementation; tests plug in recording fakes.

use async_trait::async_trait;
use mergelink_client::GitlabClient;

use crate::error::NotifyError;

/// Notifications towards the review system
#[async_trait]
pub trait RepositoryNotifier: Send + Sync {
    /// Browser URL of the merge request with the given display id
    async fn merge_request_url(&self, merge_request_iid: &str) -> Result<String, NotifyError>;

    /// Posts a note on the merge request with the given internal id
    async fn create_note(&self, merge_request_id: &str, body: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl RepositoryNotifier for GitlabClient {
    async fn merge_request_url(&self, merge_request_iid: &str) -> Result<String, NotifyError> {
        Ok(GitlabClient::merge_request_url(self, merge_request_iid).await?)
    }

    async fn create_note(&self, merge_request_id: &str, body: &str) -> Result<(), NotifyError> {
        Ok(GitlabClient::create_note(self, merge_request_id, body).await?)
    }
}
