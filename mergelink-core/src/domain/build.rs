//! Build domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::cause::{Cause, MergeRequestCause, find_merge_request_cause};

/// Build record as reported by the executor
///
/// Read-only view of a build instance. Mergelink never persists it; the
/// executor sends it along with every lifecycle callback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub id: Uuid,
    pub job_name: String,
    pub number: u64,
    /// Path relative to the executor root URL (e.g. "job/app/42/")
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub result: Option<BuildOutcome>,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub causes: Vec<Cause>,
}

impl BuildRecord {
    /// Human-facing name, e.g. "app #42"
    pub fn full_display_name(&self) -> String {
        format!("{} #{}", self.job_name, self.number)
    }

    /// Durable identifier, e.g. "app#42"
    pub fn external_id(&self) -> String {
        format!("{}#{}", self.job_name, self.number)
    }

    /// Time between start and completion; zero while the build is running
    pub fn duration(&self) -> Duration {
        self.completed_at
            .and_then(|completed| (completed - self.started_at).to_std().ok())
            .unwrap_or_default()
    }

    pub fn duration_string(&self) -> String {
        format_duration(self.duration())
    }

    pub fn merge_request_cause(&self) -> Option<&MergeRequestCause> {
        find_merge_request_cause(&self.causes)
    }
}

/// Terminal result of a build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildOutcome {
    Success,
    /// Build ran but tests or quality gates reported problems
    Unstable,
    Failure,
    Aborted,
    NotBuilt,
}

impl std::fmt::Display for BuildOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildOutcome::Success => write!(f, "Success"),
            BuildOutcome::Unstable => write!(f, "Unstable"),
            BuildOutcome::Failure => write!(f, "Failure"),
            BuildOutcome::Aborted => write!(f, "Aborted"),
            BuildOutcome::NotBuilt => write!(f, "Not built"),
        }
    }
}

/// Formats a duration the way build pages show it ("3 min 10 sec")
///
/// Only the two most significant units are kept.
pub fn format_duration(duration: Duration) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;

    let secs = duration.as_secs();

    if secs == 0 {
        return format!("{} ms", duration.subsec_millis());
    }

    if secs < 10 {
        let tenths = duration.subsec_millis() / 100;
        return format!("{}.{} sec", secs, tenths);
    }

    if secs < MINUTE {
        format!("{} sec", secs)
    } else if secs < HOUR {
        format!("{} min {} sec", secs / MINUTE, secs % MINUTE)
    } else if secs < DAY {
        format!("{} hr {} min", secs / HOUR, (secs % HOUR) / MINUTE)
    } else {
        format!("{} day {} hr", secs / DAY, (secs % DAY) / HOUR)
    }
}
