// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::store::{StoreAdapter, StoreError};
use async_trait::async_trait;
use std::time::Instant;
use tracing::Instrument;
use tally_core::{elapsed_ms, LedgerRecord, LogEntry, ReferenceItem};

/// Wrapper that adds tracing to any StoreAdapter.
///
/// Calls run inside their span via `Instrument` so the future stays `Send`.
#[derive(Clone)]
pub struct TracedStoreAdapter<S> {
    inner: S,
}

impl<S> TracedStoreAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: StoreAdapter> StoreAdapter for TracedStoreAdapter<S> {
    async fn upsert_ledger_record(&self, record: &LedgerRecord) -> Result<u64, StoreError> {
        let span = tracing::debug_span!(
            "store.upsert",
            barcode = %record.barcode,
            quantity = record.quantity
        );

        async move {
            let start = Instant::now();
            let result = self.inner.upsert_ledger_record(record).await;
            let elapsed_ms = elapsed_ms(start.elapsed());

            match &result {
                Ok(id) => tracing::trace!(record_id = id, elapsed_ms, "record upserted"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "upsert failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn append_log_entry(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let span = tracing::debug_span!("store.append", entry_id = %entry.id, barcode = %entry.barcode);

        async move {
            let start = Instant::now();
            let result = self.inner.append_log_entry(entry).await;
            let elapsed_ms = elapsed_ms(start.elapsed());

            match &result {
                Ok(()) => tracing::trace!(elapsed_ms, "entry appended"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "append failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn replace_catalog(&self, items: &[ReferenceItem]) -> Result<(), StoreError> {
        let span = tracing::info_span!("store.replace_catalog", items = items.len());

        async move {
            let start = Instant::now();
            let result = self.inner.replace_catalog(items).await;
            let elapsed_ms = elapsed_ms(start.elapsed());

            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "catalog stored"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "catalog store failed"),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn load_catalog(&self) -> Result<Vec<ReferenceItem>, StoreError> {
        let result = self.inner.load_catalog().await;
        tracing::debug!(items = result.as_ref().map(Vec::len).ok(), "catalog loaded");
        result
    }

    async fn load_ledger(&self) -> Result<Vec<LedgerRecord>, StoreError> {
        let result = self.inner.load_ledger().await;
        tracing::debug!(records = result.as_ref().map(Vec::len).ok(), "ledger loaded");
        result
    }

    async fn load_history(&self) -> Result<Vec<LogEntry>, StoreError> {
        let result = self.inner.load_history().await;
        tracing::debug!(entries = result.as_ref().map(Vec::len).ok(), "history loaded");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
