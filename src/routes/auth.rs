// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn link routes: connect, callback, status, disconnect.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::middleware::session::{resolve_or_issue, SessionContext};
use crate::models::{AuthSession, AuthStatus};
use crate::services::lifecycle::{CallbackQuery, ConnectOutcome, ResumeOutcome};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/linkedin/connect", get(connect))
        .route("/auth/linkedin/status", get(status))
        .route("/auth/linkedin/disconnect", post(disconnect))
        .route("/linkedin/callback", get(callback))
}

fn session_for(jar: CookieJar, state: &AppState) -> Result<(CookieJar, SessionContext)> {
    resolve_or_issue(jar, &state.config)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Session issue failed: {}", e)))
}

fn format_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Session status response.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionStatusResponse {
    pub status: AuthStatus,
    pub pending_since: Option<String>,
    pub connected_at: Option<String>,
    pub has_profile: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number[]"))]
    pub saved_contacts: Vec<u64>,
}

impl From<&AuthSession> for SessionStatusResponse {
    fn from(session: &AuthSession) -> Self {
        Self {
            status: session.status,
            pending_since: session.pending_since.map(format_timestamp),
            connected_at: session.connected_at.map(format_timestamp),
            has_profile: session.profile.is_some(),
            saved_contacts: session.saved_contacts().collect(),
        }
    }
}

/// User-visible confirmation.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct NoticeResponse {
    pub status: AuthStatus,
    pub message: String,
}

/// Start the link: redirect to LinkedIn's consent page.
///
/// While an attempt is already pending this answers 202 with the current
/// status instead of redirecting a second time.
async fn connect(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Response)> {
    let (jar, session) = session_for(jar, &state)?;

    let response = match state.lifecycle.initiate_connect(&session.session_id).await? {
        ConnectOutcome::Redirect { auth_url } => Redirect::to(&auth_url).into_response(),
        ConnectOutcome::AlreadyPending => {
            let current = state.lifecycle.session(&session.session_id);
            (
                StatusCode::ACCEPTED,
                Json(SessionStatusResponse::from(&current)),
            )
                .into_response()
        }
    };

    Ok((jar, response))
}

/// Provider redirect target. Always ends on the primary view; failures are
/// surfaced through `?error=`.
async fn callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Result<(CookieJar, Redirect)> {
    let (jar, session) = session_for(jar, &state)?;
    let primary_view = format!("{}/", state.config.frontend_url);

    let target = match state
        .lifecycle
        .resume_from_redirect(&session.session_id, &query)
        .await
    {
        Ok(ResumeOutcome::Denied { reason }) => format!(
            "{}?error=authorization_failed&message={}",
            primary_view,
            urlencoding::encode(&reason)
        ),
        Ok(_) => primary_view,
        Err(e) => {
            // Provider failures are logged by the controller; the redirect
            // hides everything else from the access log.
            if !e.is_provider_error() {
                tracing::error!(error = %e, code = e.code(), "Callback failed");
            }
            format!("{}?error={}", primary_view, e.code())
        }
    };

    Ok((jar, Redirect::to(&target)))
}

/// Current link status for this browser session.
async fn status(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<SessionStatusResponse>)> {
    let (jar, session) = session_for(jar, &state)?;
    let current = state.lifecycle.session(&session.session_id);
    Ok((jar, Json(SessionStatusResponse::from(&current))))
}

/// Unlink the account.
async fn disconnect(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<NoticeResponse>)> {
    let (jar, session) = session_for(jar, &state)?;
    let message = state.lifecycle.disconnect(&session.session_id)?;

    Ok((
        jar,
        Json(NoticeResponse {
            status: AuthStatus::Disconnected,
            message: message.to_string(),
        }),
    ))
}
