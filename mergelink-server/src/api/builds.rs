//! Build Lifecycle Callbacks
//!
//! The executor posts the build record when a build starts and again when
//! it finishes.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use mergelink_core::domain::build::BuildRecord;

use crate::api::AppState;
use crate::api::error::ApiResult;
use crate::repository::RemoteBuild;

/// POST /builds/started
/// Links the build page to its merge request
///
/// Always answers 204, even for a record that can't be decoded: the build
/// must not be held up by the link.
pub async fn build_started(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let record: BuildRecord = match serde_json::from_slice(&body) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Ignoring undecodable build started callback: {}", e);
            return StatusCode::NO_CONTENT;
        }
    };

    tracing::debug!("Build started: {}", record.full_display_name());

    let mut build = RemoteBuild::new(record, state.repository.clone());
    state.builds.on_started(&mut build).await;

    if let Some(description) = &build.record().description {
        tracing::debug!("Description set: {}", description);
    }

    StatusCode::NO_CONTENT
}

/// POST /builds/completed
/// Posts the outcome note on the merge request
pub async fn build_completed(
    State(state): State<AppState>,
    Json(record): Json<BuildRecord>,
) -> ApiResult<StatusCode> {
    tracing::debug!(
        "Build completed: {} ({:?})",
        record.full_display_name(),
        record.result
    );

    let build = RemoteBuild::new(record, state.repository.clone());
    state.builds.on_completed(&build).await?;

    Ok(StatusCode::NO_CONTENT)
}
