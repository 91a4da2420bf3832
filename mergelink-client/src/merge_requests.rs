//! Merge request API endpoints

use mergelink_core::dto::merge_request::{CreateNote, MergeRequest};

use crate::GitlabClient;
use crate::error::{ClientError, Result};

impl GitlabClient {
    // =============================================================================
    // Merge Requests
    // =============================================================================

    /// Get a merge request by its per-project number
    ///
    /// # Arguments
    /// * `iid` - The merge request number shown in the UI (e.g. "15")
    pub async fn get_merge_request(&self, iid: &str) -> Result<MergeRequest> {
        if iid.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "merge request iid is empty".to_string(),
            ));
        }

        let url = self.merge_request_endpoint(iid);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await.map_err(|e| match e {
            ClientError::NotFound(_) => ClientError::NotFound(format!("merge request !{}", iid)),
            e => e,
        })
    }

    /// Get the browser URL of a merge request
    ///
    /// # Arguments
    /// * `iid` - The merge request number shown in the UI
    ///
    /// # Example
    /// ```no_run
    /// # use mergelink_client::GitlabClient;
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = GitlabClient::new("https://gitlab.example.com", "group/app", "token");
    /// let url = client.merge_request_url("15").await?;
    /// assert!(url.ends_with("/merge_requests/15"));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn merge_request_url(&self, iid: &str) -> Result<String> {
        let merge_request = self.get_merge_request(iid).await?;
        Ok(merge_request.web_url)
    }

    // =============================================================================
    // Notes
    // =============================================================================

    /// Post a note (comment) on a merge request
    ///
    /// # Arguments
    /// * `merge_request_id` - Identifier the notes endpoint addresses the
    ///   merge request by
    /// * `body` - Markdown text of the note
    pub async fn create_note(&self, merge_request_id: &str, body: &str) -> Result<()> {
        if merge_request_id.trim().is_empty() {
            return Err(ClientError::InvalidRequest(
                "merge request id is empty".to_string(),
            ));
        }

        if body.trim().is_empty() {
            return Err(ClientError::InvalidRequest("note body is empty".to_string()));
        }

        let url = self.notes_endpoint(merge_request_id);
        let response = self
            .post(&url)
            .json(&CreateNote {
                body: body.to_string(),
            })
            .send()
            .await?;

        self.handle_empty_response(response).await?;

        tracing::debug!("Created note on merge request {}", merge_request_id);
        Ok(())
    }

    fn merge_request_endpoint(&self, iid: &str) -> String {
        format!(
            "{}/merge_requests/{}",
            self.project_url(),
            urlencoding::encode(iid)
        )
    }

    fn notes_endpoint(&self, merge_request_id: &str) -> String {
        format!(
            "{}/merge_requests/{}/notes",
            self.project_url(),
            urlencoding::encode(merge_request_id)
        )
    }
}
