// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage for the linked profile payload.
//!
//! Writes are synchronous so that a session read issued right after the
//! `Connected` transition always sees the payload.

use dashmap::DashMap;
use std::collections::HashMap;

use crate::error::AppError;

/// Session-scoped key-value store holding serialized profile payloads.
pub trait ProfileStore: Send + Sync {
    /// Serialize and store `value` under `key` for `session_id`.
    fn put(&self, session_id: &str, key: &str, value: &serde_json::Value) -> Result<(), AppError>;

    /// Read back a stored value, if present.
    fn get(&self, session_id: &str, key: &str) -> Result<Option<serde_json::Value>, AppError>;
}

/// In-process store. Entries hold the serialized JSON string, as a browser's
/// local storage would.
#[derive(Default)]
pub struct MemoryProfileStore {
    entries: DashMap<String, HashMap<String, String>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn put(&self, session_id: &str, key: &str, value: &serde_json::Value) -> Result<(), AppError> {
        let serialized = serde_json::to_string(value)
            .map_err(|e| AppError::Storage(format!("Failed to serialize {}: {}", key, e)))?;

        self.entries
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), serialized);

        tracing::debug!(key, "Profile payload stored");
        Ok(())
    }

    fn get(&self, session_id: &str, key: &str) -> Result<Option<serde_json::Value>, AppError> {
        let Some(session) = self.entries.get(session_id) else {
            return Ok(None);
        };

        session
            .get(key)
            .map(|raw| {
                serde_json::from_str(raw)
                    .map_err(|e| AppError::Storage(format!("Corrupt entry {}: {}", key, e)))
            })
            .transpose()
    }
}
