//! Executor seams
//!
//! The executor owns queueing, scheduling and the build records. Mergelink
//! only needs to enqueue a build with a cause attached, and to read (and
//! annotate) a build instance when a lifecycle hook fires.

use anyhow::Result;
use async_trait::async_trait;
use mergelink_core::domain::build::{BuildOutcome, BuildRecord};
use mergelink_core::domain::cause::Cause;
use mergelink_core::dto::build::QueuedBuild;
use mergelink_core::template::BuildVariables;

/// Starts builds on the executor
#[async_trait]
pub trait Executor: Send + Sync {
    /// Enqueues a build carrying the given cause
    ///
    /// An error means the executor refused or failed to schedule the build.
    async fn enqueue(&self, cause: Cause) -> Result<QueuedBuild>;
}

/// A build instance as seen by the lifecycle hooks
#[async_trait]
pub trait BuildRun: Send + Sync {
    /// Causes attached by the executor when the build was created
    fn causes(&self) -> &[Cause];

    /// Terminal outcome, `None` while the build is still running
    fn result(&self) -> Option<BuildOutcome>;

    fn duration_string(&self) -> String;

    fn external_id(&self) -> String;

    fn full_display_name(&self) -> String;

    /// Path relative to the executor root URL
    fn url(&self) -> &str;

    fn number(&self) -> u64;

    /// Replaces the description shown on the build page
    async fn set_description(&mut self, description: &str) -> Result<()>;

    /// Template variables for this build
    ///
    /// The build URL is the executor root URL followed by the relative path.
    fn variables(&self, root_url: &str) -> BuildVariables {
        BuildVariables {
            duration: self.duration_string(),
            ext_id: self.external_id(),
            full_name: self.full_display_name(),
            url: format!("{}{}", root_url, self.url()),
            number: self.number().to_string(),
        }
    }
}

/// A record held in memory; the description is kept on the record itself
#[async_trait]
impl BuildRun for BuildRecord {
    fn causes(&self) -> &[Cause] {
        &self.causes
    }

    fn result(&self) -> Option<BuildOutcome> {
        self.result
    }

    fn duration_string(&self) -> String {
        BuildRecord::duration_string(self)
    }

    fn external_id(&self) -> String {
        BuildRecord::external_id(self)
    }

    fn full_display_name(&self) -> String {
        BuildRecord::full_display_name(self)
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn number(&self) -> u64 {
        self.number
    }

    async fn set_description(&mut self, description: &str) -> Result<()> {
        self.description = Some(description.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_record() -> BuildRecord {
        let started_at = Utc::now();
        BuildRecord {
            id: Uuid::new_v4(),
            job_name: "app".to_string(),
            number: 42,
            url: "job/app/42/".to_string(),
            description: None,
            result: Some(BuildOutcome::Success),
            started_at,
            completed_at: Some(started_at + chrono::Duration::seconds(190)),
            causes: vec![Cause::ScmChange],
        }
    }

    #[test]
    fn test_variables_from_record() {
        let record = sample_record();
        let vars = record.variables("https://ci.example.com/");

        assert_eq!(
            vars,
            BuildVariables {
                duration: "3 min 10 sec".to_string(),
                ext_id: "app#42".to_string(),
                full_name: "app #42".to_string(),
                url: "https://ci.example.com/job/app/42/".to_string(),
                number: "42".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_record_set_description() {
        let mut record = sample_record();
        record.set_description("<a href=\"x\">y</a>").await.unwrap();
        assert_eq!(record.description.as_deref(), Some("<a href=\"x\">y</a>"));
    }

    #[test]
    fn test_record_exposes_causes() {
        let record = sample_record();
        let build: &dyn BuildRun = &record;
        assert_eq!(build.causes(), &[Cause::ScmChange]);
        assert_eq!(build.result(), Some(BuildOutcome::Success));
    }
}
