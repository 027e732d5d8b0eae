// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Connection data source.

use futures_util::future::BoxFuture;
use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::models::{AuthSession, NetworkSnapshot};
use crate::services::aggregation::validate_connections;

/// Where a linked account's connections come from.
pub trait ConnectionSource: Send + Sync {
    /// Fetch the full network snapshot for a Connected session.
    fn fetch_connections<'a>(
        &'a self,
        session: &'a AuthSession,
    ) -> BoxFuture<'a, Result<NetworkSnapshot, AppError>>;
}

/// Serves a fixed snapshot loaded from a JSON file.
#[derive(Debug, Default, Clone)]
pub struct FileConnectionSource {
    snapshot: NetworkSnapshot,
}

impl FileConnectionSource {
    /// Load a snapshot from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let json_data =
            fs::read_to_string(path.as_ref()).map_err(|e| SourceError::Io(e.to_string()))?;
        Self::load_from_json(&json_data)
    }

    /// Load a snapshot from a JSON string.
    pub fn load_from_json(json_data: &str) -> Result<Self, SourceError> {
        let snapshot: NetworkSnapshot =
            serde_json::from_str(json_data).map_err(|e| SourceError::Parse(e.to_string()))?;

        // Bad fixture data should stop startup, not surface per request.
        validate_connections(&snapshot.connections)
            .and_then(|_| validate_connections(&snapshot.recommendations))
            .map_err(|e| SourceError::Invalid(e.to_string()))?;

        Ok(Self { snapshot })
    }

    pub fn from_snapshot(snapshot: NetworkSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn snapshot(&self) -> &NetworkSnapshot {
        &self.snapshot
    }
}

impl ConnectionSource for FileConnectionSource {
    fn fetch_connections<'a>(
        &'a self,
        session: &'a AuthSession,
    ) -> BoxFuture<'a, Result<NetworkSnapshot, AppError>> {
        Box::pin(async move {
            tracing::debug!(
                connected_at = ?session.connected_at,
                connections = self.snapshot.connections.len(),
                recommendations = self.snapshot.recommendations.len(),
                "Serving network snapshot"
            );
            Ok(self.snapshot.clone())
        })
    }
}

/// Errors loading a connection fixture.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid network data: {0}")]
    Invalid(String),
}
