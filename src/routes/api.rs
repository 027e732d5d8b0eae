// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for linked sessions.

use crate::error::{AppError, Result};
use crate::middleware::session::SessionContext;
use crate::models::{AuthStatus, Connection, ConnectionId, ConnectionStats, Insight};
use crate::services::aggregation::{collapse_tail, compute_stats, insights, validate_connections};
use crate::services::recommendations::filter_connections;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require a session cookie).
/// The session middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/profile", get(get_profile))
        .route("/api/network/stats", get(get_network_stats))
        .route("/api/network/recommendations", get(get_recommendations))
        .route("/api/network/recommendations/{id}/save", post(save_recommendation))
        .route("/api/network/refresh", post(refresh_network))
}

// ─── Profile ─────────────────────────────────────────────────

/// Stored LinkedIn profile payload, returned as-is.
async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<serde_json::Value>> {
    if state.lifecycle.status(&session.session_id) != AuthStatus::Connected {
        return Err(AppError::NotConnected);
    }

    state
        .lifecycle
        .stored_profile(&session.session_id)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("LinkedIn profile".to_string()))
}

// ─── Network Stats ───────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Keep at most this many groups per breakdown, folding the rest into "Other".
    pub max_groups: Option<usize>,
}

/// Stats plus derived observations.
#[derive(Serialize)]
pub struct NetworkStatsResponse {
    #[serde(flatten)]
    pub stats: ConnectionStats,
    /// First/second/third-plus share of extended reach, in percent.
    pub reach_shares: [f64; 3],
    pub insights: Vec<Insight>,
}

async fn get_network_stats(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<NetworkStatsResponse>> {
    let network = state.lifecycle.network_snapshot(&session.session_id).await?;
    let mut stats = compute_stats(&network, state.config.growth_window_months)?;
    let found = insights(&stats, &network.recommendations);

    match query.max_groups {
        Some(0) => {
            return Err(AppError::BadRequest(
                "max_groups must be at least 1".to_string(),
            ))
        }
        Some(max_groups) => {
            stats.industry_breakdown = collapse_tail(&stats.industry_breakdown, max_groups);
            stats.role_breakdown = collapse_tail(&stats.role_breakdown, max_groups);
        }
        None => {}
    }

    Ok(Json(NetworkStatsResponse {
        reach_shares: stats.reach_tiers.shares(),
        stats,
        insights: found,
    }))
}

// ─── Recommendations ─────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsQuery {
    #[serde(default)]
    pub q: String,
}

/// Filtered recommendation list.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RecommendationsResponse {
    pub query: String,
    pub total: usize,
    pub recommendations: Vec<Connection>,
    #[cfg_attr(feature = "binding-generation", ts(type = "number[]"))]
    pub saved: Vec<ConnectionId>,
}

async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Query(query): Query<RecommendationsQuery>,
) -> Result<Json<RecommendationsResponse>> {
    let network = state.lifecycle.network_snapshot(&session.session_id).await?;
    validate_connections(&network.recommendations)?;

    let recommendations = filter_connections(&network.recommendations, &query.q);
    let saved = state
        .lifecycle
        .session(&session.session_id)
        .saved_contacts()
        .collect();

    Ok(Json(RecommendationsResponse {
        query: query.q,
        total: network.recommendations.len(),
        recommendations,
        saved,
    }))
}

/// Confirmation after saving a contact.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SaveContactResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub contact_id: ConnectionId,
    pub message: String,
}

async fn save_recommendation(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
    Path(id): Path<ConnectionId>,
) -> Result<Json<SaveContactResponse>> {
    let message = state.lifecycle.save_contact(&session.session_id, id).await?;
    Ok(Json(SaveContactResponse {
        contact_id: id,
        message,
    }))
}

// ─── Refresh ─────────────────────────────────────────────────

/// Sizes of the refreshed collection.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct RefreshResponse {
    pub connections: usize,
    pub recommendations: usize,
}

async fn refresh_network(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<SessionContext>,
) -> Result<Json<RefreshResponse>> {
    let network = state.lifecycle.refresh_network(&session.session_id).await?;
    Ok(Json(RefreshResponse {
        connections: network.connections.len(),
        recommendations: network.recommendations.len(),
    }))
}
