//! Executor DTOs
//!
//! Requests sent to the executor API and the handles it returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cause::Cause;

/// Request to enqueue a build carrying the given cause
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchBuild {
    pub job: String,
    pub cause: Cause,
}

/// Handle for a build accepted by the executor queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueuedBuild {
    pub id: Uuid,
    pub job: String,
    pub queued_at: DateTime<Utc>,
}

/// Replace the description shown on a build page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDescription {
    pub description: String,
}
