// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod connection;
pub mod session;
pub mod stats;

pub use connection::{Connection, ConnectionField, ConnectionId, NetworkSnapshot};
pub use session::{AuthSession, AuthStatus};
pub use stats::{Breakdown, ConnectionStats, GrowthDelta, Insight, ReachTiers};
