// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Model Catalog Client error taxonomy.

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("catalog returned status {status}: {body}")]
    BadStatus { status: u16, body: String },
}
