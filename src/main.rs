// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Network Insights API Server
//!
//! Links a LinkedIn account through the hosted OAuth service and serves
//! aggregated statistics and recommendations for its connections.

use network_insights::{
    config::Config,
    db::MemoryProfileStore,
    services::{FileConnectionSource, LifecycleController, LinkedInAuthClient},
    AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Network Insights API");

    tracing::info!(path = %config.network_data_path, "Loading network data");
    let source = FileConnectionSource::load_from_file(&config.network_data_path)?;
    tracing::info!(
        connections = source.snapshot().connections.len(),
        recommendations = source.snapshot().recommendations.len(),
        "Network data loaded"
    );

    let auth_client = LinkedInAuthClient::new(
        config.auth_api_url.clone(),
        Duration::from_secs(config.http_timeout_secs),
    )?;
    tracing::info!(auth_api = %auth_client.base_url(), "LinkedIn auth client initialized");

    let lifecycle = LifecycleController::new(
        Arc::new(auth_client),
        Arc::new(MemoryProfileStore::new()),
        Arc::new(source),
        chrono::Duration::minutes(config.pending_timeout_minutes),
    );

    let state = Arc::new(AppState {
        config: config.clone(),
        lifecycle,
    });

    let app = network_insights::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("network_insights=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
