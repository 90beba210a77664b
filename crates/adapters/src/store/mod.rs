// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable store adapters

mod wal;

pub use wal::WalStoreAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeStoreAdapter, StoreCall};

use async_trait::async_trait;
use tally_core::{LedgerRecord, LogEntry, ReferenceItem};
use tally_storage::WalError;
use thiserror::Error;

/// Errors from durable store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Wal(#[from] WalError),
    #[error("store task failed: {0}")]
    Task(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Adapter for the durable store behind the write-behind cache.
///
/// `upsert_ledger_record` and `append_log_entry` must be safe to repeat: the
/// persister retries a whole flush after any failure.
#[async_trait]
pub trait StoreAdapter: Clone + Send + Sync + 'static {
    /// Insert or update the record with the same barcode; returns its durable id
    async fn upsert_ledger_record(&self, record: &LedgerRecord) -> Result<u64, StoreError>;

    /// Append a history entry; an entry id already stored is a no-op
    async fn append_log_entry(&self, entry: &LogEntry) -> Result<(), StoreError>;

    /// Replace the stored reference catalog
    async fn replace_catalog(&self, items: &[ReferenceItem]) -> Result<(), StoreError>;

    async fn load_catalog(&self) -> Result<Vec<ReferenceItem>, StoreError>;

    async fn load_ledger(&self) -> Result<Vec<LedgerRecord>, StoreError>;

    /// History in append order
    async fn load_history(&self) -> Result<Vec<LogEntry>, StoreError>;
}
