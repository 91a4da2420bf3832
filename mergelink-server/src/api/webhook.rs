//! GitLab Webhook Handler
//!
//! Turns merge request events into builds. Everything that is not a
//! buildable merge request event is acknowledged and dropped so GitLab
//! does not retry or disable the hook.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::HeaderMap,
};
use hmac::{Hmac, Mac};
use mergelink_core::dto::merge_request::MergeRequestEvent;
use serde::Serialize;
use sha2::Sha256;

use crate::api::AppState;
use crate::api::error::{ApiError, ApiResult};

pub const EVENT_HEADER: &str = "x-gitlab-event";
pub const TOKEN_HEADER: &str = "x-gitlab-token";
pub const MERGE_REQUEST_HOOK: &str = "Merge Request Hook";

const EVENT_IGNORED: &str = "Event ignored";

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: String,
}

impl WebhookResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

/// POST /webhook/gitlab
pub async fn gitlab_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    if let Some(secret) = state.webhook_secret.as_deref() {
        let token = headers
            .get(TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if !token.is_some_and(|token| token_matches(secret, token)) {
            tracing::warn!("Rejected webhook with missing or invalid token");
            return Err(ApiError::Unauthorized);
        }
    }

    let event_type = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if event_type != MERGE_REQUEST_HOOK {
        tracing::debug!("Ignoring GitLab event: {:?}", event_type);
        return Ok(WebhookResponse::new(EVENT_IGNORED));
    }

    let event: MergeRequestEvent = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid merge request event: {}", e)))?;

    if !event.should_build() {
        tracing::debug!(
            "Ignoring merge request !{} (state={}, action={:?})",
            event.object_attributes.iid,
            event.object_attributes.state,
            event.object_attributes.action
        );
        return Ok(WebhookResponse::new(EVENT_IGNORED));
    }

    let identity = event.identity();
    tracing::info!(
        "Building merge request !{} ({} => {})",
        identity.iid,
        identity.source_branch,
        identity.target_branch
    );

    let ack = state.builds.build(&identity).await;
    Ok(WebhookResponse::new(ack))
}

/// Compares the received token with the secret in constant time
///
/// Both values are MACed under the secret and the tags compared by `hmac`.
fn token_matches(secret: &str, token: &str) -> bool {
    let mac = |message: &[u8]| {
        HmacSha256::new_from_slice(secret.as_bytes()).map(|mut mac| {
            mac.update(message);
            mac
        })
    };

    let (Ok(expected), Ok(received)) = (mac(secret.as_bytes()), mac(token.as_bytes())) else {
        return false;
    };

    received
        .verify_slice(&expected.finalize().into_bytes())
        .is_ok()
}
