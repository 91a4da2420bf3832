//! Merge request builds
//!
//! Starts builds for merge requests and reports on them:
//! - `build` enqueues a build carrying a merge request cause
//! - `on_started` links the build page back to the merge request
//! - `on_completed` posts the outcome as a note on the merge request
//!
//! Builds without a merge request cause are ignored by both hooks.

use std::sync::Arc;

use mergelink_core::domain::cause::{Cause, MergeRequestCause, find_merge_request_cause};
use mergelink_core::dto::merge_request::MergeRequestIdentity;
use mergelink_core::template::render;
use tracing::{debug, error, info};

use crate::config::BridgeConfig;
use crate::error::NotifyError;
use crate::executor::{BuildRun, Executor};
use crate::notifier::RepositoryNotifier;

/// Returned by `build` whether or not the executor accepted the build
pub const TRIGGER_ACKNOWLEDGEMENT: &str = "Build triggered.";

/// Build trigger and lifecycle hooks for merge request builds
pub struct MergeRequestBuilds {
    executor: Arc<dyn Executor>,
    notifier: Arc<dyn RepositoryNotifier>,
    config: BridgeConfig,
}

impl MergeRequestBuilds {
    pub fn new(
        executor: Arc<dyn Executor>,
        notifier: Arc<dyn RepositoryNotifier>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            executor,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Asks the executor to start a build for a merge request
    ///
    /// Fire-and-forget: scheduling failures are logged and the
    /// acknowledgement is returned regardless, so the inbound webhook never
    /// fails because of the executor.
    pub async fn build(&self, identity: &MergeRequestIdentity) -> &'static str {
        let cause = match MergeRequestCause::try_from(identity) {
            Ok(cause) => cause,
            Err(e) => {
                error!(
                    "Job failed to start for merge request !{}: {}",
                    identity.iid, e
                );
                return TRIGGER_ACKNOWLEDGEMENT;
            }
        };

        match self.executor.enqueue(Cause::MergeRequest(cause)).await {
            Ok(queued) => {
                info!(
                    build_id = %queued.id,
                    job = %queued.job,
                    merge_request = %identity.iid,
                    "Build queued for merge request"
                );
            }
            Err(e) => {
                error!(
                    "Job failed to start for merge request !{}: {:#}",
                    identity.iid, e
                );
            }
        }

        TRIGGER_ACKNOWLEDGEMENT
    }

    /// Recovers the merge request cause of a build, if it has one
    pub fn recover_cause(build: &dyn BuildRun) -> Option<&MergeRequestCause> {
        find_merge_request_cause(build.causes())
    }

    /// Build started hook
    ///
    /// Sets the build description to a link to the merge request. Failures
    /// are logged and swallowed: the build must never be held up by the
    /// review system.
    pub async fn on_started(&self, build: &mut dyn BuildRun) {
        let Some(cause) = Self::recover_cause(build).cloned() else {
            debug!(
                "{} has no merge request cause, skipping description",
                build.full_display_name()
            );
            return;
        };

        let url = match self
            .notifier
            .merge_request_url(cause.merge_request_iid())
            .await
        {
            Ok(url) => url,
            Err(e) => {
                error!("Can't update build description: {}", e);
                return;
            }
        };

        let description = format!(
            "<a href=\"{}\">{}</a>",
            escape_html(&url),
            escape_html(&started_message(&cause))
        );

        if let Err(e) = build.set_description(&description).await {
            error!("Can't update build description: {:#}", e);
            return;
        }

        debug!(
            "Linked {} to merge request !{}",
            build.full_display_name(),
            cause.merge_request_iid()
        );
    }

    /// Build completed hook
    ///
    /// Posts the outcome note on the merge request. A failure to post is
    /// returned to the caller and not retried; the build's own result is
    /// never touched.
    pub async fn on_completed(&self, build: &dyn BuildRun) -> Result<(), NotifyError> {
        let Some(cause) = Self::recover_cause(build) else {
            debug!(
                "{} has no merge request cause, skipping note",
                build.full_display_name()
            );
            return Ok(());
        };

        let note = self.completion_note(build);

        if let Err(e) = self
            .notifier
            .create_note(cause.merge_request_id(), &note)
            .await
        {
            error!(
                "Can't post build note on merge request !{}: {}",
                cause.merge_request_iid(),
                e
            );
            return Err(e);
        }

        info!(
            build = %build.full_display_name(),
            merge_request = %cause.merge_request_iid(),
            "Posted build note"
        );

        Ok(())
    }

    /// Renders the note for a finished build
    ///
    /// Picks the success, unstable or failure template by outcome.
    pub fn completion_note(&self, build: &dyn BuildRun) -> String {
        let template = self.config.templates.for_outcome(build.result());
        render(template, &build.variables(&self.config.root_url))
    }
}

/// Identity line shown on the build page, e.g.
/// "Merge Request #15 (feature/x => main)"
pub fn started_message(cause: &MergeRequestCause) -> String {
    format!(
        "Merge Request #{} ({} => {})",
        cause.merge_request_iid(),
        cause.source_branch(),
        cause.target_branch()
    )
}

/// Escapes text for the description link
///
/// `>` is kept as-is: it can't open markup and branch arrows ("=>") must
/// read unchanged.
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
