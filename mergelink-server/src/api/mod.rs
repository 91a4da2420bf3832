//! API Module
//!
//! HTTP API layer for mergelink.
//! Each submodule handles the endpoints of one inbound party.

pub mod builds;
pub mod error;
pub mod health;
pub mod webhook;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mergelink_bridge::MergeRequestBuilds;
use tower_http::trace::TraceLayer;

use crate::repository::BuildRepository;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub builds: Arc<MergeRequestBuilds>,
    pub repository: Arc<dyn BuildRepository>,
    /// Expected X-Gitlab-Token value; `None` disables the check
    pub webhook_secret: Option<String>,
}

impl AppState {
    pub fn new(
        builds: Arc<MergeRequestBuilds>,
        repository: Arc<dyn BuildRepository>,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            builds,
            repository,
            webhook_secret,
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // GitLab
        .route("/webhook/gitlab", post(webhook::gitlab_webhook))
        // Executor lifecycle callbacks
        .route("/builds/started", post(builds::build_started))
        .route("/builds/completed", post(builds::build_completed))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
