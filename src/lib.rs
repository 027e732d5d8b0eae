// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Network Insights: LinkedIn connection analytics
//!
//! This crate provides the backend API that links a LinkedIn account
//! through the hosted OAuth service, then aggregates the account's
//! connections into network statistics and filterable recommendations.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use services::LifecycleController;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub lifecycle: LifecycleController,
}
