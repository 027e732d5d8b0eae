// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-session state of the LinkedIn account link.
//!
//! The redirect flow spans two entry points (connect, then callback), so the
//! state lives here explicitly, keyed by session id, rather than in whatever
//! handler happens to be running.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::models::{ConnectionId, NetworkSnapshot};

/// Link status of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum AuthStatus {
    #[default]
    Disconnected,
    Pending,
    Connected,
}

impl fmt::Display for AuthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AuthStatus::Disconnected => "disconnected",
            AuthStatus::Pending => "pending",
            AuthStatus::Connected => "connected",
        };
        f.write_str(s)
    }
}

/// OAuth link state for one browser session.
#[derive(Debug, Clone, Default)]
pub struct AuthSession {
    pub session_id: String,
    pub status: AuthStatus,
    /// Provider payload; only present while Connected
    pub profile: Option<serde_json::Value>,
    /// Code currently being exchanged; cleared once the exchange settles
    pub authorization_code: Option<String>,
    pub pending_since: Option<DateTime<Utc>>,
    pub connected_at: Option<DateTime<Utc>>,
    /// Every code ever accepted for exchange. Survives disconnect.
    consumed_codes: HashSet<String>,
    /// Bumped on each Pending attempt so a stale attempt cannot revert a newer one
    attempt: u64,
    network: Option<Arc<NetworkSnapshot>>,
    saved_contacts: BTreeSet<ConnectionId>,
}

impl AuthSession {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            ..Default::default()
        }
    }

    /// Whether a Pending attempt has outlived `timeout` and counts as abandoned.
    pub fn is_pending_stale(&self, now: DateTime<Utc>, timeout: Duration) -> bool {
        match (self.status, self.pending_since) {
            (AuthStatus::Pending, Some(since)) => now.signed_duration_since(since) >= timeout,
            _ => false,
        }
    }

    /// Enter Pending for a new connect attempt. Returns the attempt number.
    pub fn begin_pending(&mut self, now: DateTime<Utc>) -> u64 {
        self.attempt += 1;
        self.status = AuthStatus::Pending;
        self.pending_since = Some(now);
        self.authorization_code = None;
        self.attempt
    }

    /// Revert a failed attempt to Disconnected.
    ///
    /// Returns `false` (and changes nothing) if `attempt` is no longer the
    /// live attempt or the session already left Pending.
    pub fn fail_pending(&mut self, attempt: u64) -> bool {
        if self.attempt != attempt || self.status != AuthStatus::Pending {
            return false;
        }
        self.status = AuthStatus::Disconnected;
        self.pending_since = None;
        self.authorization_code = None;
        true
    }

    pub fn current_attempt(&self) -> u64 {
        self.attempt
    }

    /// Whether a code exchange for the live attempt has not settled yet.
    pub fn exchange_in_flight(&self) -> bool {
        self.status == AuthStatus::Pending && self.authorization_code.is_some()
    }

    pub fn is_code_consumed(&self, code: &str) -> bool {
        self.consumed_codes.contains(code)
    }

    /// Claim an authorization code for exchange.
    ///
    /// Returns `true` if the code was new. Returns `false` if it was already
    /// consumed, in which case it must not be exchanged again.
    pub fn consume_code(&mut self, code: &str, now: DateTime<Utc>) -> bool {
        if !self.consumed_codes.insert(code.to_string()) {
            return false;
        }
        self.authorization_code = Some(code.to_string());
        if self.status != AuthStatus::Pending {
            // Landing after a reload: the original Pending marker is gone.
            self.begin_pending(now);
        }
        true
    }

    /// Finish the Pending → Connected transition.
    pub fn complete_connection(&mut self, profile: serde_json::Value, now: DateTime<Utc>) {
        self.status = AuthStatus::Connected;
        self.profile = Some(profile);
        self.authorization_code = None;
        self.pending_since = None;
        self.connected_at = Some(now);
        self.network = None;
    }

    /// Drop everything tied to the linked account.
    pub fn disconnect(&mut self) {
        self.status = AuthStatus::Disconnected;
        self.profile = None;
        self.authorization_code = None;
        self.pending_since = None;
        self.connected_at = None;
        self.network = None;
        self.saved_contacts.clear();
    }

    pub fn network(&self) -> Option<Arc<NetworkSnapshot>> {
        self.network.clone()
    }

    /// Replace the connection collection wholesale.
    pub fn set_network(&mut self, snapshot: Arc<NetworkSnapshot>) {
        self.network = Some(snapshot);
    }

    /// Record a saved contact. Returns `false` if it was already saved.
    pub fn save_contact(&mut self, id: ConnectionId) -> bool {
        self.saved_contacts.insert(id)
    }

    pub fn saved_contacts(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.saved_contacts.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(minute: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_760_000_000 + minute * 60, 0).unwrap()
    }

    #[test]
    fn test_consume_code_is_single_use() {
        let mut session = AuthSession::new("s1");
        session.begin_pending(at(0));

        assert!(session.consume_code("abc", at(1)));
        assert!(!session.consume_code("abc", at(2)));
        assert!(session.is_code_consumed("abc"));
        assert_eq!(session.authorization_code.as_deref(), Some("abc"));
    }

    #[test]
    fn test_exchange_in_flight_until_settled() {
        let mut session = AuthSession::new("s1");
        let attempt = session.begin_pending(at(0));
        assert!(!session.exchange_in_flight());

        session.consume_code("abc", at(1));
        assert!(session.exchange_in_flight());

        session.fail_pending(attempt);
        assert!(!session.exchange_in_flight());

        // A new attempt abandons whatever the old one was exchanging.
        session.consume_code("def", at(2));
        session.begin_pending(at(30));
        assert!(!session.exchange_in_flight());
    }

    #[test]
    fn test_consumed_codes_survive_disconnect() {
        let mut session = AuthSession::new("s1");
        session.consume_code("abc", at(0));
        session.complete_connection(serde_json::json!({"id": "u1"}), at(1));
        session.disconnect();

        assert_eq!(session.status, AuthStatus::Disconnected);
        assert!(session.profile.is_none());
        assert!(!session.consume_code("abc", at(2)));
    }

    #[test]
    fn test_consume_code_from_disconnected_enters_pending() {
        let mut session = AuthSession::new("s1");

        assert!(session.consume_code("abc", at(0)));
        assert_eq!(session.status, AuthStatus::Pending);
        assert_eq!(session.current_attempt(), 1);
    }

    #[test]
    fn test_stale_attempt_cannot_revert_newer_one() {
        let mut session = AuthSession::new("s1");
        let first = session.begin_pending(at(0));
        let second = session.begin_pending(at(20));

        assert!(!session.fail_pending(first));
        assert_eq!(session.status, AuthStatus::Pending);
        assert!(session.fail_pending(second));
        assert_eq!(session.status, AuthStatus::Disconnected);
    }

    #[test]
    fn test_pending_staleness() {
        let mut session = AuthSession::new("s1");
        let timeout = Duration::minutes(15);
        assert!(!session.is_pending_stale(at(30), timeout));

        session.begin_pending(at(0));
        assert!(!session.is_pending_stale(at(14), timeout));
        assert!(session.is_pending_stale(at(15), timeout));
    }

    #[test]
    fn test_complete_connection_clears_transient_fields() {
        let mut session = AuthSession::new("s1");
        session.consume_code("abc", at(0));
        session.complete_connection(serde_json::json!({"name": "Ada"}), at(1));

        assert_eq!(session.status, AuthStatus::Connected);
        assert!(session.authorization_code.is_none());
        assert!(session.pending_since.is_none());
        assert_eq!(session.connected_at, Some(at(1)));
    }
}
