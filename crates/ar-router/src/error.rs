// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! RoutingError: raised only once every selection stage is exhausted.

use ar_core::TaskType;
use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("no model could be routed for task {task_type}: tried {attempted_models:?}")]
pub struct RoutingError {
    pub task_type: TaskType,
    pub attempted_models: Vec<String>,
}
