// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Professional contacts and the network snapshot they arrive in.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Identifier assigned by the source network.
pub type ConnectionId = u64;

/// One professional contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Connection {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: ConnectionId,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: String,
    pub company: String,
    pub industry: String,
    pub mutual_connections: u32,
    /// Recency label such as "2 weeks ago"; never parsed.
    pub recent_activity: String,
    #[validate(range(max = 100))]
    pub profile_strength: u8,
}

/// Which text attribute of a [`Connection`] to group or search by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionField {
    Name,
    Role,
    Company,
    Industry,
}

impl ConnectionField {
    /// Fields consulted by recommendation search, in match order.
    pub const SEARCHABLE: [ConnectionField; 4] = [
        ConnectionField::Name,
        ConnectionField::Role,
        ConnectionField::Company,
        ConnectionField::Industry,
    ];

    pub fn value<'a>(&self, connection: &'a Connection) -> &'a str {
        match self {
            ConnectionField::Name => &connection.name,
            ConnectionField::Role => &connection.role,
            ConnectionField::Company => &connection.company,
            ConnectionField::Industry => &connection.industry,
        }
    }
}

/// Everything the connection source returns for a linked account.
///
/// Reach estimates are kept signed as received so that bad upstream data
/// is rejected by aggregation instead of silently wrapping.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSnapshot {
    /// The user's direct (first-degree) connections
    #[serde(default)]
    pub connections: Vec<Connection>,
    /// Suggested contacts shown in the recommendations list
    #[serde(default)]
    pub recommendations: Vec<Connection>,
    pub second_degree_estimate: i64,
    pub third_degree_estimate: i64,
    /// Direct connection count at the start of the growth window
    pub connections_at_window_start: u64,
}

impl NetworkSnapshot {
    /// Look up a recommended contact by id.
    pub fn recommendation(&self, id: ConnectionId) -> Option<&Connection> {
        self.recommendations.iter().find(|c| c.id == id)
    }
}
