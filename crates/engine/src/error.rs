// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine

use tally_adapters::StoreError;
use tally_core::ImportError;
use thiserror::Error;

/// Errors surfaced to the host by session operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("import error: {0}")]
    Import(#[from] ImportError),
}
