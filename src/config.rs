// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honored for local development.

use std::env;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the LinkedIn auth API (initiation + code exchange)
    pub auth_api_url: String,
    /// Frontend URL; the primary view after a successful link
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// HS256 key for session cookies (raw bytes)
    pub session_signing_key: Vec<u8>,
    /// JSON fixture backing the connection source
    pub network_data_path: String,
    /// A Pending attempt older than this is treated as abandoned
    pub pending_timeout_minutes: i64,
    /// Trailing window for the growth delta
    pub growth_window_months: u32,
    /// Timeout for outbound auth API calls
    pub http_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            auth_api_url: env::var("AUTH_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),
            frontend_url: env::var("FRONTEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            port: parse_or("PORT", 8080)?,
            session_signing_key: env::var("SESSION_SIGNING_KEY")
                .map_err(|_| ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
            network_data_path: env::var("NETWORK_DATA_PATH")
                .unwrap_or_else(|_| "data/sample_network.json".to_string()),
            pending_timeout_minutes: parse_in_range(
                "PENDING_TIMEOUT_MINUTES",
                15,
                1..=MAX_PENDING_TIMEOUT_MINUTES,
            )?,
            growth_window_months: parse_or("GROWTH_WINDOW_MONTHS", 6)?,
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", 10)?,
        })
    }

    /// Config for tests: local URLs and a fixed signing key.
    pub fn test_default() -> Self {
        Self {
            auth_api_url: "http://127.0.0.1:5000".to_string(),
            frontend_url: "http://localhost:5173".to_string(),
            port: 8080,
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
            network_data_path: "data/sample_network.json".to_string(),
            pending_timeout_minutes: 15,
            growth_window_months: 6,
            http_timeout_secs: 5,
        }
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.frontend_url.starts_with("https://")
    }
}

/// Longest accepted Pending timeout (one week).
const MAX_PENDING_TIMEOUT_MINUTES: i64 = 7 * 24 * 60;

fn parse_in_range<T: FromStr + PartialOrd + ToString>(
    name: &'static str,
    default: T,
    range: RangeInclusive<T>,
) -> Result<T, ConfigError> {
    let value = parse_or(name, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid(name, value.to_string()));
    }
    Ok(value)
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
