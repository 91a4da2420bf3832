//! Error types for review-system notifications

use mergelink_client::ClientError;
use thiserror::Error;

/// Errors reported by a `RepositoryNotifier`
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The review system could not be reached (connection, timeout, I/O)
    #[error("review system unreachable: {0}")]
    Transport(String),

    /// The review system answered with an error status
    #[error("review system rejected the request (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// The merge request does not exist
    #[error("merge request not found: {0}")]
    NotFound(String),

    /// Anything else (malformed response, invalid input)
    #[error("notification failed: {0}")]
    Other(String),
}

impl NotifyError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl From<ClientError> for NotifyError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::RequestFailed(e) => NotifyError::Transport(e.to_string()),
            ClientError::NotFound(message) => NotifyError::NotFound(message),
            ClientError::ApiError { status, message } => NotifyError::Rejected { status, message },
            ClientError::ParseError(msg) | ClientError::InvalidRequest(msg) => {
                NotifyError::Other(msg)
            }
        }
    }
}
