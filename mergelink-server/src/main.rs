//! Mergelink Server
//!
//! HTTP glue between GitLab and the build executor:
//! - GitLab merge request webhooks trigger builds
//! - Executor lifecycle callbacks (started / completed) update the build
//!   description and post outcome notes on the merge request

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use mergelink_bridge::MergeRequestBuilds;
use mergelink_client::GitlabClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod repository;

use crate::api::AppState;
use crate::config::Config;
use crate::repository::HttpExecutor;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "mergelink_server=info,mergelink_bridge=info,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mergelink...");

    let config = Config::parse();
    config.validate()?;

    tracing::info!(
        "Loaded configuration: gitlab_url={}, project={}, executor_url={}, job={}",
        config.gitlab_url,
        config.gitlab_project,
        config.executor_url,
        config.job
    );

    let gitlab = Arc::new(GitlabClient::new(
        config.gitlab_url.clone(),
        &config.gitlab_project,
        config.gitlab_token.clone(),
    ));
    let executor = Arc::new(HttpExecutor::new(
        config.executor_url.clone(),
        config.job.clone(),
    ));

    let builds = Arc::new(MergeRequestBuilds::new(
        executor.clone(),
        gitlab,
        config.bridge_config(),
    ));

    if config.webhook_secret().is_none() {
        tracing::warn!("MERGELINK_WEBHOOK_SECRET not set -- webhook token validation disabled");
    }

    let state = AppState::new(builds, executor, config.webhook_secret().map(str::to_string));
    let app = api::create_router(state);

    tracing::info!("Listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;

    axum::serve(listener, app)
        .await
        .context("Server terminated unexpectedly")?;

    Ok(())
}
