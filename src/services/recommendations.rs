// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recommendation search.

use crate::models::{Connection, ConnectionField};

/// Connections whose name, role, company or industry contains `query`,
/// ignoring case.
///
/// Returns a fresh vector in input order; an empty query matches everything.
pub fn filter_connections(connections: &[Connection], query: &str) -> Vec<Connection> {
    if query.is_empty() {
        return connections.to_vec();
    }

    let needle = query.to_lowercase();
    connections
        .iter()
        .filter(|c| matches_query(c, &needle))
        .cloned()
        .collect()
}

/// `needle` must already be lowercased.
fn matches_query(connection: &Connection, needle: &str) -> bool {
    ConnectionField::SEARCHABLE
        .iter()
        .any(|field| field.value(connection).to_lowercase().contains(needle))
}
