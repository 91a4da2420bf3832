//! Build cause domain types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing a cause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CauseError {
    /// The merge request internal id is empty
    #[error("merge request id is required")]
    MissingMergeRequestId,
}

/// Links a build to the merge request that triggered it
///
/// Created once when the build is enqueued and carried by the build record
/// for its whole lifetime. Fields are only readable; the internal id is the
/// correlation key for notes, everything else is display-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MergeRequestCauseFields")]
pub struct MergeRequestCause {
    merge_request_id: String,
    merge_request_iid: String,
    source_branch: String,
    target_branch: String,
}

impl MergeRequestCause {
    /// Creates a new cause
    ///
    /// # Arguments
    /// * `merge_request_id` - GitLab-wide merge request id (required)
    /// * `merge_request_iid` - Per-project merge request number
    /// * `source_branch` - Branch the changes come from
    /// * `target_branch` - Branch the changes are proposed for
    pub fn new(
        merge_request_id: impl Into<String>,
        merge_request_iid: impl Into<String>,
        source_branch: impl Into<String>,
        target_branch: impl Into<String>,
    ) -> Result<Self, CauseError> {
        let merge_request_id = merge_request_id.into();
        if merge_request_id.trim().is_empty() {
            return Err(CauseError::MissingMergeRequestId);
        }

        Ok(Self {
            merge_request_id,
            merge_request_iid: merge_request_iid.into(),
            source_branch: source_branch.into(),
            target_branch: target_branch.into(),
        })
    }

    pub fn merge_request_id(&self) -> &str {
        &self.merge_request_id
    }

    pub fn merge_request_iid(&self) -> &str {
        &self.merge_request_iid
    }

    pub fn source_branch(&self) -> &str {
        &self.source_branch
    }

    pub fn target_branch(&self) -> &str {
        &self.target_branch
    }
}

impl std::fmt::Display for MergeRequestCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "GitLab Merge Request #{} : {} => {}",
            self.merge_request_iid, self.source_branch, self.target_branch
        )
    }
}

/// Unvalidated wire form of a merge request cause
#[derive(Deserialize)]
struct MergeRequestCauseFields {
    merge_request_id: String,
    #[serde(default)]
    merge_request_iid: String,
    #[serde(default)]
    source_branch: String,
    #[serde(default)]
    target_branch: String,
}

impl TryFrom<MergeRequestCauseFields> for MergeRequestCause {
    type Error = CauseError;

    fn try_from(fields: MergeRequestCauseFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.merge_request_id,
            fields.merge_request_iid,
            fields.source_branch,
            fields.target_branch,
        )
    }
}

/// Why a build was started
///
/// A build may carry several causes at once (for example a manual rebuild
/// of a merge request build keeps both).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Cause {
    /// Triggered by a merge request event
    MergeRequest(MergeRequestCause),
    /// Started by hand
    User { user_id: String },
    /// Source control polling found changes
    ScmChange,
    /// Periodic schedule
    Timer,
    /// Triggered by another build finishing
    Upstream { project: String, build_number: u64 },
    /// Remote API call
    Remote {
        host: String,
        #[serde(default)]
        note: Option<String>,
    },
    /// Any cause type mergelink does not model; its fields are dropped
    #[serde(other)]
    Other,
}

impl Cause {
    /// Returns the merge request cause if this is one
    pub fn as_merge_request(&self) -> Option<&MergeRequestCause> {
        match self {
            Cause::MergeRequest(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Finds the merge request cause among a build's causes
///
/// Matches on the variant, not on position: the first merge request cause
/// wins wherever it sits in the list.
pub fn find_merge_request_cause(causes: &[Cause]) -> Option<&MergeRequestCause> {
    causes.iter().find_map(Cause::as_merge_request)
}
