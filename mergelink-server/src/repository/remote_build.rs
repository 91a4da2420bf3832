//! Builds reported by the executor through lifecycle callbacks

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use mergelink_bridge::BuildRun;
use mergelink_core::domain::build::{BuildOutcome, BuildRecord};
use mergelink_core::domain::cause::Cause;

use super::BuildRepository;

/// A build record received from the executor
///
/// Reads come from the record; description changes are written back to the
/// executor and mirrored on the record.
pub struct RemoteBuild {
    record: BuildRecord,
    repository: Arc<dyn BuildRepository>,
}

impl RemoteBuild {
    pub fn new(record: BuildRecord, repository: Arc<dyn BuildRepository>) -> Self {
        Self { record, repository }
    }

    pub fn record(&self) -> &BuildRecord {
        &self.record
    }
}

#[async_trait]
impl BuildRun for RemoteBuild {
    fn causes(&self) -> &[Cause] {
        &self.record.causes
    }

    fn result(&self) -> Option<BuildOutcome> {
        self.record.result
    }

    fn duration_string(&self) -> String {
        self.record.duration_string()
    }

    fn external_id(&self) -> String {
        self.record.external_id()
    }

    fn full_display_name(&self) -> String {
        self.record.full_display_name()
    }

    fn url(&self) -> &str {
        &self.record.url
    }

    fn number(&self) -> u64 {
        self.record.number
    }

    async fn set_description(&mut self, description: &str) -> Result<()> {
        self.repository
            .update_description(self.record.id, description)
            .await?;
        self.record.description = Some(description.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct RecordingRepository {
        updates: Mutex<Vec<(Uuid, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl BuildRepository for RecordingRepository {
        async fn update_description(&self, build_id: Uuid, description: &str) -> Result<()> {
            if self.fail {
                anyhow::bail!("executor unavailable");
            }
            self.updates
                .lock()
                .unwrap()
                .push((build_id, description.to_string()));
            Ok(())
        }
    }

    fn sample_record() -> BuildRecord {
        BuildRecord {
            id: Uuid::new_v4(),
            job_name: "app".to_string(),
            number: 7,
            url: "job/app/7/".to_string(),
            description: None,
            result: None,
            started_at: Utc::now(),
            completed_at: None,
            causes: vec![Cause::Timer],
        }
    }

    #[tokio::test]
    async fn test_set_description_writes_through() {
        let repository = Arc::new(RecordingRepository::default());
        let record = sample_record();
        let id = record.id;
        let mut build = RemoteBuild::new(record, repository.clone());

        build.set_description("linked").await.unwrap();

        assert_eq!(build.record().description.as_deref(), Some("linked"));
        assert_eq!(
            repository.updates.lock().unwrap().as_slice(),
            &[(id, "linked".to_string())]
        );
    }

    #[tokio::test]
    async fn test_failed_write_leaves_record_untouched() {
        let repository = Arc::new(RecordingRepository {
            fail: true,
            ..Default::default()
        });
        let mut build = RemoteBuild::new(sample_record(), repository);

        assert!(build.set_description("linked").await.is_err());
        assert_eq!(build.record().description, None);
    }

    #[test]
    fn test_reads_come_from_record() {
        let build = RemoteBuild::new(sample_record(), Arc::new(RecordingRepository::default()));

        assert_eq!(build.full_display_name(), "app #7");
        assert_eq!(build.external_id(), "app#7");
        assert_eq!(build.number(), 7);
        assert_eq!(build.result(), None);
        assert_eq!(build.causes(), &[Cause::Timer]);
    }
}
