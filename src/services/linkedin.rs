// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LinkedIn auth API client.
//!
//! Handles:
//! - Fetching the provider authorization URL (`GET /linkedin/login`)
//! - Exchanging an authorization code for the profile payload
//!   (`GET /linkedin/callback?code=...`)
//!
//! The token exchange itself happens behind the auth API; this side only
//! sees the resulting profile JSON.

use futures_util::future::BoxFuture;
use serde::Deserialize;
use std::time::Duration;

use crate::error::AppError;

/// Provider side of the redirect flow.
pub trait AuthProvider: Send + Sync {
    /// Fetch the URL the user should be redirected to for consent.
    fn authorization_url(&self) -> BoxFuture<'_, Result<String, AppError>>;

    /// Exchange a single-use authorization code for the profile payload.
    fn exchange_code<'a>(&'a self, code: &'a str)
        -> BoxFuture<'a, Result<serde_json::Value, AppError>>;
}

/// Response of the initiation endpoint.
#[derive(Debug, Deserialize)]
struct AuthUrlResponse {
    auth_url: Option<String>,
}

/// HTTP client for the LinkedIn auth API.
#[derive(Clone)]
pub struct LinkedInAuthClient {
    http: reqwest::Client,
    base_url: String,
}

impl LinkedInAuthClient {
    const LOGIN_PATH: &'static str = "/linkedin/login";
    const CALLBACK_PATH: &'static str = "/linkedin/callback";

    /// Create a client for the auth API at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_authorization_url(&self) -> Result<String, AppError> {
        let url = format!("{}{}", self.base_url, Self::LOGIN_PATH);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::AuthInitiation(format!("Auth API unreachable: {}", e)))?;

        let body: AuthUrlResponse = check_response_json(response)
            .await
            .map_err(AppError::AuthInitiation)?;

        let auth_url = body
            .auth_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| AppError::AuthInitiation("Response missing auth_url".to_string()))?;

        // Reject anything the browser could not navigate to.
        reqwest::Url::parse(&auth_url)
            .map_err(|e| AppError::AuthInitiation(format!("Malformed auth_url: {}", e)))?;

        Ok(auth_url)
    }

    async fn fetch_profile(&self, code: &str) -> Result<serde_json::Value, AppError> {
        let url = format!("{}{}", self.base_url, Self::CALLBACK_PATH);

        let response = self
            .http
            .get(&url)
            .query(&[("code", code)])
            .send()
            .await
            .map_err(|e| AppError::AuthExchange(format!("Auth API unreachable: {}", e)))?;

        check_response_json(response)
            .await
            .map_err(AppError::AuthExchange)
    }
}

impl AuthProvider for LinkedInAuthClient {
    fn authorization_url(&self) -> BoxFuture<'_, Result<String, AppError>> {
        Box::pin(self.fetch_authorization_url())
    }

    fn exchange_code<'a>(
        &'a self,
        code: &'a str,
    ) -> BoxFuture<'a, Result<serde_json::Value, AppError>> {
        Box::pin(self.fetch_profile(code))
    }
}

/// Check response status and parse the JSON body.
///
/// Errors come back as plain messages so each call site can wrap them in
/// its own error kind.
async fn check_response_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, String> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = %status, body = %body, "Auth API returned an error");
        return Err(format!("HTTP {}", status));
    }

    response
        .json()
        .await
        .map_err(|e| format!("JSON parse error: {}", e))
}
