// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie handling.
//!
//! The cookie carries an HS256 JWT whose subject is the session id. The id is
//! what keys the `AuthSession` on the server; it is passed explicitly to the
//! lifecycle controller rather than held in any global.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::Config;
use crate::error::AppError;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "network_session";

/// Session lifetime (7 days), enforced through the token expiry.
const SESSION_TTL_SECS: usize = 7 * 24 * 60 * 60;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (session id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

/// Session resolved from the request cookie.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("Random source unavailable")]
    Random,

    #[error("System time error: {0}")]
    Clock(#[from] std::time::SystemTimeError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

/// Generate a fresh, unguessable session id.
pub fn new_session_id() -> Result<String, SessionTokenError> {
    let mut bytes = [0u8; 32];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| SessionTokenError::Random)?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Create a signed session token.
pub fn create_session_token(session_id: &str, signing_key: &[u8]) -> Result<String, SessionTokenError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: session_id.to_string(),
        iat: now,
        exp: now + SESSION_TTL_SECS,
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?)
}

/// Verify a session token and return the session id.
pub fn verify_session_token(token: &str, signing_key: &[u8]) -> Option<String> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(token, &key, &validation)
        .ok()
        .map(|data| data.claims.sub)
        .filter(|sub| !sub.is_empty())
}

fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies())
        .build()
}

/// Resolve the session from the cookie jar, issuing a new one if absent or invalid.
///
/// Returns the (possibly updated) jar so handlers can hand it back in the response.
pub fn resolve_or_issue(
    jar: CookieJar,
    config: &Config,
) -> Result<(CookieJar, SessionContext), SessionTokenError> {
    if let Some(session_id) = jar
        .get(SESSION_COOKIE)
        .and_then(|c| verify_session_token(c.value(), &config.session_signing_key))
    {
        return Ok((jar, SessionContext { session_id }));
    }

    let session_id = new_session_id()?;
    let token = create_session_token(&session_id, &config.session_signing_key)?;
    tracing::debug!("Issued new session cookie");

    Ok((
        jar.add(session_cookie(token, config)),
        SessionContext { session_id },
    ))
}

/// Middleware that requires a valid session cookie.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session_id = jar
        .get(SESSION_COOKIE)
        .and_then(|c| verify_session_token(c.value(), &state.config.session_signing_key))
        .ok_or(AppError::Unauthorized)?;

    request
        .extensions_mut()
        .insert(SessionContext { session_id });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_session_key_32_bytes_min!!!";

    #[test]
    fn test_token_roundtrip() {
        let id = new_session_id().unwrap();
        let token = create_session_token(&id, KEY).unwrap();

        assert_eq!(verify_session_token(&token, KEY), Some(id));
    }

    #[test]
    fn test_token_with_wrong_key_is_rejected() {
        let token = create_session_token("abc", KEY).unwrap();
        assert_eq!(verify_session_token(&token, b"another_key_entirely_32_bytes!!!"), None);
        assert_eq!(verify_session_token("not-a-jwt", KEY), None);
    }

    #[test]
    fn test_session_ids_are_unique_and_url_safe() {
        let a = new_session_id().unwrap();
        let b = new_session_id().unwrap();

        assert_ne!(a, b);
        assert_eq!(a.len(), 43);
        assert!(!a.contains('+') && !a.contains('/') && !a.contains('='));
    }

    #[test]
    fn test_resolve_reuses_valid_cookie() {
        let config = Config::test_default();
        let token = create_session_token("existing", &config.session_signing_key).unwrap();
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, token));

        let (_, ctx) = resolve_or_issue(jar, &config).unwrap();
        assert_eq!(ctx.session_id, "existing");
    }

    #[test]
    fn test_resolve_issues_cookie_when_missing() {
        let config = Config::test_default();

        let (jar, ctx) = resolve_or_issue(CookieJar::new(), &config).unwrap();
        let cookie = jar.get(SESSION_COOKIE).expect("cookie should be set");

        assert_eq!(
            verify_session_token(cookie.value(), &config.session_signing_key),
            Some(ctx.session_id)
        );
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
