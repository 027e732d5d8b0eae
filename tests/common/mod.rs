// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use futures_util::future::BoxFuture;
use network_insights::config::Config;
use network_insights::db::{MemoryProfileStore, ProfileStore};
use network_insights::error::AppError;
use network_insights::middleware::session::{create_session_token, SESSION_COOKIE};
use network_insights::models::{Connection, NetworkSnapshot};
use network_insights::routes::create_router;
use network_insights::services::{
    AuthProvider, ConnectionSource, FileConnectionSource, LifecycleController,
};
use network_insights::AppState;
use serde_json::json;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Consent URL handed out by the mock provider.
#[allow(dead_code)]
pub const AUTH_URL: &str = "https://www.linkedin.com/oauth/v2/authorization?client_id=test";

/// In-process provider that counts calls and can be made to fail or block.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockAuthProvider {
    pub auth_url_calls: AtomicUsize,
    pub exchange_calls: AtomicUsize,
    pub fail_auth_url: AtomicBool,
    pub fail_exchange: AtomicBool,
    /// When set, each call waits for a notification before answering.
    pub gate: Option<Arc<Notify>>,
}

#[allow(dead_code)]
impl MockAuthProvider {
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Default::default()
        }
    }

    pub fn auth_url_calls(&self) -> usize {
        self.auth_url_calls.load(Ordering::SeqCst)
    }

    pub fn exchange_calls(&self) -> usize {
        self.exchange_calls.load(Ordering::SeqCst)
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
    }
}

impl AuthProvider for MockAuthProvider {
    fn authorization_url(&self) -> BoxFuture<'_, Result<String, AppError>> {
        Box::pin(async move {
            self.auth_url_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_for_gate().await;
            if self.fail_auth_url.load(Ordering::SeqCst) {
                return Err(AppError::AuthInitiation(
                    "Response missing auth_url".to_string(),
                ));
            }
            Ok(AUTH_URL.to_string())
        })
    }

    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, AppError>> {
        Box::pin(async move {
            self.exchange_calls.fetch_add(1, Ordering::SeqCst);
            self.wait_for_gate().await;
            if self.fail_exchange.load(Ordering::SeqCst) {
                return Err(AppError::AuthExchange("HTTP 400 Bad Request".to_string()));
            }
            Ok(json!({
                "id": "li-123",
                "localizedFirstName": "Jordan",
                "localizedLastName": "Avery",
                "code": code,
            }))
        })
    }
}

/// Profile store whose writes always fail.
#[allow(dead_code)]
pub struct FailingProfileStore;

impl ProfileStore for FailingProfileStore {
    fn put(&self, _session_id: &str, _key: &str, _value: &serde_json::Value) -> Result<(), AppError> {
        Err(AppError::Storage("quota exceeded".to_string()))
    }

    fn get(&self, _session_id: &str, _key: &str) -> Result<Option<serde_json::Value>, AppError> {
        Ok(None)
    }
}

/// Build a connection with the given grouping fields.
#[allow(dead_code)]
pub fn connection(id: u64, name: &str, role: &str, company: &str, industry: &str) -> Connection {
    Connection {
        id,
        name: name.to_string(),
        role: role.to_string(),
        company: company.to_string(),
        industry: industry.to_string(),
        mutual_connections: 0,
        recent_activity: "1 week ago".to_string(),
        profile_strength: 50,
    }
}

/// The bundled network fixture.
#[allow(dead_code)]
pub fn sample_source() -> FileConnectionSource {
    FileConnectionSource::load_from_file("data/sample_network.json")
        .expect("Failed to load data/sample_network.json")
}

#[allow(dead_code)]
pub fn sample_snapshot() -> NetworkSnapshot {
    sample_source().snapshot().clone()
}

/// Controller wired to the given provider and the bundled fixture.
#[allow(dead_code)]
pub fn test_controller(provider: Arc<MockAuthProvider>) -> LifecycleController {
    controller_with(provider, Arc::new(MemoryProfileStore::new()), Arc::new(sample_source()))
}

#[allow(dead_code)]
pub fn controller_with(
    provider: Arc<MockAuthProvider>,
    profiles: Arc<dyn ProfileStore>,
    source: Arc<dyn ConnectionSource>,
) -> LifecycleController {
    LifecycleController::new(provider, profiles, source, chrono::Duration::minutes(15))
}

/// Create a test app with an in-process provider.
/// Returns the router, the shared state and the provider.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MockAuthProvider>) {
    let provider = Arc::new(MockAuthProvider::default());
    let state = Arc::new(AppState {
        config: Config::test_default(),
        lifecycle: test_controller(provider.clone()),
    });

    (create_router(state.clone()), state, provider)
}

/// `Cookie` header value for an existing session.
#[allow(dead_code)]
pub fn session_cookie(config: &Config, session_id: &str) -> String {
    let token = create_session_token(session_id, &config.session_signing_key)
        .expect("Failed to create session token");
    format!("{}={}", SESSION_COOKIE, token)
}
