// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn link lifecycle: Disconnected → Pending → Connected → Disconnected.
//!
//! The flow spans two entry points. `initiate_connect` runs when the user
//! clicks connect and ends in a redirect to the provider;
//! `resume_from_redirect` runs when the provider sends the browser back.
//!
//! Every check-and-set on a session happens while holding its map entry and
//! the entry is released before any await. That gives two guarantees under
//! concurrent requests:
//! - at most one Pending attempt per session is in flight
//! - an authorization code is exchanged at most once per session

use chrono::{Duration, Utc};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::{keys, ProfileStore};
use crate::error::{AppError, Result};
use crate::models::{AuthSession, AuthStatus, ConnectionId, NetworkSnapshot};
use crate::services::connections::ConnectionSource;
use crate::services::linkedin::AuthProvider;

/// Confirmation shown after a disconnect.
pub const DISCONNECT_NOTICE: &str = "Your LinkedIn profile has been disconnected.";

/// Result of `initiate_connect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    /// Navigate the browser to the provider.
    Redirect { auth_url: String },
    /// An attempt is already in flight; nothing was requested.
    AlreadyPending,
}

/// Result of `resume_from_redirect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// Code exchanged, profile stored, session linked.
    Connected,
    /// Landing without a code and without a provider error.
    NoCode,
    /// The provider reported an error instead of a code.
    Denied { reason: String },
    /// This code was already exchanged (or is being exchanged).
    AlreadyConsumed,
    /// The session is already linked; the code was ignored.
    AlreadyConnected,
    /// Another code is being exchanged for this attempt; the code was ignored.
    ExchangeInFlight,
}

/// Query parameters the provider appends when redirecting back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl CallbackQuery {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            ..Default::default()
        }
    }

    /// The authorization code, ignoring blank values.
    fn code(&self) -> Option<&str> {
        self.code.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }
}

/// Owns every `AuthSession` and drives its transitions.
pub struct LifecycleController {
    provider: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    source: Arc<dyn ConnectionSource>,
    sessions: DashMap<String, AuthSession>,
    pending_timeout: Duration,
}

impl LifecycleController {
    pub fn new(
        provider: Arc<dyn AuthProvider>,
        profiles: Arc<dyn ProfileStore>,
        source: Arc<dyn ConnectionSource>,
        pending_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            profiles,
            source,
            sessions: DashMap::new(),
            pending_timeout,
        }
    }

    fn session_entry(&self, session_id: &str) -> RefMut<'_, String, AuthSession> {
        self.sessions
            .entry(session_id.to_string())
            .or_insert_with(|| AuthSession::new(session_id))
    }

    /// Snapshot of a session's state. Unknown sessions read as Disconnected.
    pub fn session(&self, session_id: &str) -> AuthSession {
        self.sessions
            .get(session_id)
            .map(|s| s.value().clone())
            .unwrap_or_else(|| AuthSession::new(session_id))
    }

    pub fn status(&self, session_id: &str) -> AuthStatus {
        self.sessions
            .get(session_id)
            .map(|s| s.status)
            .unwrap_or_default()
    }

    // ─── Connect ─────────────────────────────────────────────────────────────

    /// Start linking: enter Pending and fetch the provider authorization URL.
    ///
    /// A second call while Pending is a no-op unless the earlier attempt has
    /// outlived the pending timeout, in which case it counts as abandoned.
    pub async fn initiate_connect(&self, session_id: &str) -> Result<ConnectOutcome> {
        let now = Utc::now();

        let attempt = {
            let mut session = self.session_entry(session_id);
            match session.status {
                AuthStatus::Connected => {
                    return Err(AppError::InvalidTransition {
                        from: AuthStatus::Connected,
                        action: "connect",
                    });
                }
                AuthStatus::Pending if !session.is_pending_stale(now, self.pending_timeout) => {
                    tracing::info!(
                        attempt = session.current_attempt(),
                        "Connect requested while pending, ignoring"
                    );
                    return Ok(ConnectOutcome::AlreadyPending);
                }
                AuthStatus::Pending => {
                    tracing::warn!(
                        attempt = session.current_attempt(),
                        pending_since = ?session.pending_since,
                        "Abandoning stale pending attempt"
                    );
                }
                AuthStatus::Disconnected => {}
            }
            session.begin_pending(now)
        };

        match self.provider.authorization_url().await {
            Ok(auth_url) => {
                tracing::info!(attempt, "Authorization URL received, redirecting to LinkedIn");
                Ok(ConnectOutcome::Redirect { auth_url })
            }
            Err(e) => {
                let err = match e {
                    AppError::AuthInitiation(_) => e,
                    other => AppError::AuthInitiation(other.to_string()),
                };
                self.revert_pending(session_id, attempt);
                tracing::warn!(attempt, error = %err, "Connect failed, session disconnected");
                Err(err)
            }
        }
    }

    // ─── Callback ────────────────────────────────────────────────────────────

    /// Resume after the provider redirects back.
    ///
    /// The code is marked consumed before the exchange starts and stays
    /// consumed whatever the outcome; it is never retried. While one exchange
    /// is in flight, any other code for the same attempt is ignored.
    pub async fn resume_from_redirect(
        &self,
        session_id: &str,
        query: &CallbackQuery,
    ) -> Result<ResumeOutcome> {
        let Some(code) = query.code().map(str::to_string) else {
            return Ok(self.land_without_code(session_id, query));
        };

        let attempt = {
            let mut session = self.session_entry(session_id);
            if session.is_code_consumed(&code) {
                tracing::info!("Authorization code already consumed, ignoring");
                return Ok(ResumeOutcome::AlreadyConsumed);
            }
            if session.status == AuthStatus::Connected {
                tracing::info!("Callback received while connected, ignoring code");
                return Ok(ResumeOutcome::AlreadyConnected);
            }
            if session.exchange_in_flight() {
                tracing::info!(
                    attempt = session.current_attempt(),
                    "Exchange already in flight, ignoring code"
                );
                return Ok(ResumeOutcome::ExchangeInFlight);
            }
            session.consume_code(&code, Utc::now());
            session.current_attempt()
        };

        tracing::info!(attempt, "Exchanging authorization code");

        let profile = match self.provider.exchange_code(&code).await {
            Ok(serde_json::Value::Null) => Err(AppError::AuthExchange(
                "Empty profile payload".to_string(),
            )),
            Ok(profile) => Ok(profile),
            Err(e @ AppError::AuthExchange(_)) => Err(e),
            Err(other) => Err(AppError::AuthExchange(other.to_string())),
        };

        let profile = match profile {
            Ok(profile) => profile,
            Err(err) => {
                self.revert_pending(session_id, attempt);
                tracing::warn!(attempt, error = %err, "Code exchange failed, session disconnected");
                return Err(err);
            }
        };

        // The write must land before the session reads as Connected.
        if let Err(err) = self
            .profiles
            .put(session_id, keys::LINKEDIN_PROFILE, &profile)
        {
            self.revert_pending(session_id, attempt);
            return Err(err);
        }

        self.session_entry(session_id)
            .complete_connection(profile, Utc::now());

        tracing::info!(attempt, "LinkedIn account connected");
        Ok(ResumeOutcome::Connected)
    }

    fn land_without_code(&self, session_id: &str, query: &CallbackQuery) -> ResumeOutcome {
        let Some(error) = query.error.as_deref() else {
            tracing::debug!("Callback without code, nothing to do");
            return ResumeOutcome::NoCode;
        };

        let reason = query
            .error_description
            .clone()
            .unwrap_or_else(|| error.to_string());

        if let Some(mut session) = self.sessions.get_mut(session_id) {
            let attempt = session.current_attempt();
            session.fail_pending(attempt);
        }

        tracing::warn!(error = %error, reason = %reason, "LinkedIn authorization denied");
        ResumeOutcome::Denied { reason }
    }

    fn revert_pending(&self, session_id: &str, attempt: u64) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            if !session.fail_pending(attempt) {
                tracing::debug!(attempt, "Attempt superseded, leaving session as is");
            }
        }
    }

    // ─── Disconnect ──────────────────────────────────────────────────────────

    /// Unlink the account. Only valid while Connected.
    ///
    /// The persisted profile entry is left for the storage owner to clear.
    pub fn disconnect(&self, session_id: &str) -> Result<&'static str> {
        let Some(mut session) = self.sessions.get_mut(session_id) else {
            return Err(AppError::InvalidTransition {
                from: AuthStatus::Disconnected,
                action: "disconnect",
            });
        };
        if session.status != AuthStatus::Connected {
            return Err(AppError::InvalidTransition {
                from: session.status,
                action: "disconnect",
            });
        }

        session.disconnect();
        tracing::info!("LinkedIn account disconnected");
        Ok(DISCONNECT_NOTICE)
    }

    // ─── Network Data ────────────────────────────────────────────────────────

    /// The session's connection collection, fetched on first use.
    pub async fn network_snapshot(&self, session_id: &str) -> Result<Arc<NetworkSnapshot>> {
        let session = self.connected_session(session_id)?;
        if let Some(network) = session.network() {
            return Ok(network);
        }
        self.load_network(session).await
    }

    /// Replace the session's connection collection with a fresh fetch.
    pub async fn refresh_network(&self, session_id: &str) -> Result<Arc<NetworkSnapshot>> {
        let session = self.connected_session(session_id)?;
        tracing::info!("Refreshing network snapshot");
        self.load_network(session).await
    }

    async fn load_network(&self, session: AuthSession) -> Result<Arc<NetworkSnapshot>> {
        let snapshot = Arc::new(self.source.fetch_connections(&session).await?);

        // Only keep it if the session is still the same link.
        if let Some(mut current) = self.sessions.get_mut(&session.session_id) {
            if current.status == AuthStatus::Connected && current.connected_at == session.connected_at
            {
                current.set_network(snapshot.clone());
            }
        }

        Ok(snapshot)
    }

    fn connected_session(&self, session_id: &str) -> Result<AuthSession> {
        self.sessions
            .get(session_id)
            .filter(|s| s.status == AuthStatus::Connected)
            .map(|s| s.value().clone())
            .ok_or(AppError::NotConnected)
    }

    /// Mark a recommended contact as saved and return the confirmation.
    pub async fn save_contact(&self, session_id: &str, id: ConnectionId) -> Result<String> {
        let network = self.network_snapshot(session_id).await?;
        let contact = network
            .recommendation(id)
            .ok_or_else(|| AppError::NotFound(format!("Recommendation {}", id)))?;

        let mut session = self
            .sessions
            .get_mut(session_id)
            .filter(|s| s.status == AuthStatus::Connected)
            .ok_or(AppError::NotConnected)?;

        if session.save_contact(id) {
            tracing::info!(contact_id = id, "Recommendation saved");
        }

        Ok(format!("You've saved {} to your contacts list.", contact.name))
    }

    /// The persisted profile payload, if one was stored for this session.
    pub fn stored_profile(&self, session_id: &str) -> Result<Option<serde_json::Value>> {
        self.profiles.get(session_id, keys::LINKEDIN_PROFILE)
    }
}
