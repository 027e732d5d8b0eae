// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod aggregation;
pub mod connections;
pub mod lifecycle;
pub mod linkedin;
pub mod recommendations;

pub use connections::{ConnectionSource, FileConnectionSource, SourceError};
pub use lifecycle::{CallbackQuery, ConnectOutcome, LifecycleController, ResumeOutcome};
pub use linkedin::{AuthProvider, LinkedInAuthClient};
