// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake store adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tally_core::{LedgerRecord, LogEntry, ReferenceItem};

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Upsert { barcode: String, quantity: u32 },
    Append { entry_id: String },
    ReplaceCatalog { items: usize },
}

#[derive(Default)]
struct FakeStoreState {
    catalog: Vec<ReferenceItem>,
    records: HashMap<String, (u64, LedgerRecord)>,
    log: Vec<LogEntry>,
    calls: Vec<StoreCall>,
    /// Number of upcoming write calls that fail
    failures: usize,
    delay: Option<Duration>,
}

/// In-memory store with failure injection
#[derive(Clone, Default)]
pub struct FakeStoreAdapter {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl FakeStoreAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` write calls fail
    pub fn fail_next(&self, count: usize) {
        self.lock().failures = count;
    }

    /// Delay every write call (simulates a slow device store)
    pub fn set_delay(&self, delay: Duration) {
        self.lock().delay = Some(delay);
    }

    /// Seed stored records as if written by an earlier session
    pub fn seed_ledger(&self, records: Vec<LedgerRecord>) {
        let mut inner = self.lock();
        for record in records {
            let id = inner.records.len() as u64 + 1;
            inner.records.insert(record.barcode.clone(), (id, record));
        }
    }

    pub fn seed_history(&self, entries: Vec<LogEntry>) {
        self.lock().log.extend(entries);
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.lock().calls.clone()
    }

    pub fn record(&self, barcode: &str) -> Option<LedgerRecord> {
        self.lock().records.get(barcode).map(|(_, r)| r.clone())
    }

    pub fn record_id(&self, barcode: &str) -> Option<u64> {
        self.lock().records.get(barcode).map(|(id, _)| *id)
    }

    pub fn history(&self) -> Vec<LogEntry> {
        self.lock().log.clone()
    }

    pub fn catalog(&self) -> Vec<ReferenceItem> {
        self.lock().catalog.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeStoreState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call, then apply delay and injected failure
    async fn begin_write(&self, call: StoreCall) -> Result<(), StoreError> {
        let delay = {
            let mut inner = self.lock();
            inner.calls.push(call);
            inner.delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut inner = self.lock();
        if inner.failures > 0 {
            inner.failures -= 1;
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl StoreAdapter for FakeStoreAdapter {
    async fn upsert_ledger_record(&self, record: &LedgerRecord) -> Result<u64, StoreError> {
        self.begin_write(StoreCall::Upsert {
            barcode: record.barcode.clone(),
            quantity: record.quantity,
        })
        .await?;

        let mut inner = self.lock();
        let next_id = inner.records.len() as u64 + 1;
        let (id, stored) = inner
            .records
            .entry(record.barcode.clone())
            .or_insert_with(|| (next_id, record.clone()));
        stored.quantity = record.quantity;
        stored.updated_at = record.updated_at;
        Ok(*id)
    }

    async fn append_log_entry(&self, entry: &LogEntry) -> Result<(), StoreError> {
        self.begin_write(StoreCall::Append {
            entry_id: entry.id.clone(),
        })
        .await?;

        let mut inner = self.lock();
        if !inner.log.iter().any(|e| e.id == entry.id) {
            inner.log.push(entry.clone());
        }
        Ok(())
    }

    async fn replace_catalog(&self, items: &[ReferenceItem]) -> Result<(), StoreError> {
        self.begin_write(StoreCall::ReplaceCatalog { items: items.len() })
            .await?;
        self.lock().catalog = items.to_vec();
        Ok(())
    }

    async fn load_catalog(&self) -> Result<Vec<ReferenceItem>, StoreError> {
        Ok(self.catalog())
    }

    async fn load_ledger(&self) -> Result<Vec<LedgerRecord>, StoreError> {
        let inner = self.lock();
        let mut records: Vec<_> = inner.records.values().cloned().collect();
        records.sort_by_key(|(id, _)| *id);
        Ok(records.into_iter().map(|(_, r)| r).collect())
    }

    async fn load_history(&self) -> Result<Vec<LogEntry>, StoreError> {
        Ok(self.history())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
