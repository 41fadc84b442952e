// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ar-router: multi-stage Task Router over a model catalog snapshot and
//! per-workspace routing configuration.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod router;
pub mod rules;
pub mod types;

pub use error::RoutingError;
pub use router::{estimate_cost, TaskRouter};
pub use rules::{RoutingRules, TaskRule};
pub use types::{Preset, TaskOverride, TaskRoutingRequest, WorkspaceRoutingConfig};
