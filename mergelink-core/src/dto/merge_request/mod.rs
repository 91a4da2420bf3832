//! Merge request DTOs
//!
//! The identity handed to the build trigger, the GitLab merge request
//! webhook payload it is usually extracted from, and the GitLab API
//! messages used for notes.

use serde::{Deserialize, Serialize};

use crate::domain::cause::{CauseError, MergeRequestCause};

/// Identity of a merge request as needed to trigger a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequestIdentity {
    /// GitLab-wide id
    pub id: String,
    /// Per-project number shown to users
    pub iid: String,
    pub source_branch: String,
    pub target_branch: String,
}

impl TryFrom<&MergeRequestIdentity> for MergeRequestCause {
    type Error = CauseError;

    fn try_from(identity: &MergeRequestIdentity) -> Result<Self, Self::Error> {
        MergeRequestCause::new(
            identity.id.clone(),
            identity.iid.clone(),
            identity.source_branch.clone(),
            identity.target_branch.clone(),
        )
    }
}

/// GitLab "Merge Request Hook" payload
///
/// Only the fields mergelink reads are modelled; the rest is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestEvent {
    pub object_kind: String,
    pub object_attributes: MergeRequestAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MergeRequestAttributes {
    pub id: u64,
    pub iid: u64,
    pub source_branch: String,
    pub target_branch: String,
    pub state: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    /// Previous head commit; only present when an update pushed commits
    #[serde(default)]
    pub oldrev: Option<String>,
}

impl MergeRequestEvent {
    /// Whether this event should start a build
    ///
    /// Opened and reopened merge requests build, and so do updates that
    /// pushed new commits. Title edits, approvals, merges and closes don't.
    pub fn should_build(&self) -> bool {
        let attrs = &self.object_attributes;

        if self.object_kind != "merge_request" || attrs.state != "opened" {
            return false;
        }

        match attrs.action.as_deref() {
            Some("open") | Some("reopen") => true,
            Some("update") => attrs.oldrev.is_some(),
            _ => false,
        }
    }

    pub fn identity(&self) -> MergeRequestIdentity {
        let attrs = &self.object_attributes;
        MergeRequestIdentity {
            id: attrs.id.to_string(),
            iid: attrs.iid.to_string(),
            source_branch: attrs.source_branch.clone(),
            target_branch: attrs.target_branch.clone(),
        }
    }
}

/// Merge request as returned by the GitLab API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeRequest {
    pub id: u64,
    pub iid: u64,
    #[serde(default)]
    pub title: String,
    pub web_url: String,
    pub source_branch: String,
    pub target_branch: String,
    pub state: String,
}

/// Request body for posting a note on a merge request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNote {
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_json(action: &str, state: &str, oldrev: Option<&str>) -> serde_json::Value {
        let mut attrs = serde_json::json!({
            "id": 9001,
            "iid": 15,
            "title": "Add feature x",
            "source_branch": "feature/x",
            "target_branch": "main",
            "state": state,
            "action": action,
            "url": "https://gitlab.example.com/group/app/-/merge_requests/15",
        });
        if let Some(rev) = oldrev {
            attrs["oldrev"] = serde_json::json!(rev);
        }

        serde_json::json!({
            "object_kind": "merge_request",
            "event_type": "merge_request",
            "user": { "username": "alice" },
            "object_attributes": attrs,
        })
    }

    fn parse(json: serde_json::Value) -> MergeRequestEvent {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_should_build_open_and_reopen() {
        assert!(parse(event_json("open", "opened", None)).should_build());
        assert!(parse(event_json("reopen", "opened", None)).should_build());
    }

    #[test]
    fn test_should_build_update_requires_new_commits() {
        assert!(!parse(event_json("update", "opened", None)).should_build());
        assert!(parse(event_json("update", "opened", Some("abc123"))).should_build());
    }

    #[test]
    fn test_should_not_build_other_actions() {
        assert!(!parse(event_json("merge", "merged", None)).should_build());
        assert!(!parse(event_json("close", "closed", None)).should_build());
        assert!(!parse(event_json("approved", "opened", None)).should_build());
    }

    #[test]
    fn test_should_not_build_other_object_kind() {
        let mut json = event_json("open", "opened", None);
        json["object_kind"] = serde_json::json!("note");
        assert!(!parse(json).should_build());
    }

    #[test]
    fn test_identity_from_event() {
        let identity = parse(event_json("open", "opened", None)).identity();
        assert_eq!(
            identity,
            MergeRequestIdentity {
                id: "9001".to_string(),
                iid: "15".to_string(),
                source_branch: "feature/x".to_string(),
                target_branch: "main".to_string(),
            }
        );
    }

    #[test]
    fn test_identity_to_cause() {
        let identity = parse(event_json("open", "opened", None)).identity();
        let cause = MergeRequestCause::try_from(&identity).unwrap();
        assert_eq!(cause.merge_request_id(), "9001");
        assert_eq!(cause.merge_request_iid(), "15");

        let empty = MergeRequestIdentity {
            id: String::new(),
            ..identity
        };
        assert!(MergeRequestCause::try_from(&empty).is_err());
    }
}
