// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store adapter over the WAL-backed store

use super::{StoreAdapter, StoreError};
use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tally_core::{LedgerRecord, LogEntry, ReferenceItem};
use tally_storage::{WalError, WalStore};

/// Runs every store call on the blocking pool so file I/O never stalls the
/// async runtime.
#[derive(Clone)]
pub struct WalStoreAdapter {
    store: Arc<Mutex<WalStore>>,
}

impl WalStoreAdapter {
    pub fn new(store: WalStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Open the store at `path`, replaying its WAL
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Ok(Self::new(WalStore::open(path)?))
    }

    /// Rewrite the WAL to its minimal form
    pub async fn compact(&self) -> Result<(), StoreError> {
        self.with_store(|store| store.compact()).await
    }

    async fn with_store<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut WalStore) -> Result<T, WalError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || {
            let mut store = store.lock().unwrap_or_else(|e| e.into_inner());
            f(&mut store)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?;
        Ok(result?)
    }
}

#[async_trait]
impl StoreAdapter for WalStoreAdapter {
    async fn upsert_ledger_record(&self, record: &LedgerRecord) -> Result<u64, StoreError> {
        let record = record.clone();
        self.with_store(move |store| store.upsert_ledger_record(&record))
            .await
    }

    async fn append_log_entry(&self, entry: &LogEntry) -> Result<(), StoreError> {
        let entry = entry.clone();
        self.with_store(move |store| store.append_log_entry(&entry).map(|_| ()))
            .await
    }

    async fn replace_catalog(&self, items: &[ReferenceItem]) -> Result<(), StoreError> {
        let items = items.to_vec();
        self.with_store(move |store| store.replace_catalog(&items))
            .await
    }

    async fn load_catalog(&self) -> Result<Vec<ReferenceItem>, StoreError> {
        self.with_store(|store| Ok(store.state().catalog_items()))
            .await
    }

    async fn load_ledger(&self) -> Result<Vec<LedgerRecord>, StoreError> {
        self.with_store(|store| {
            Ok(store
                .state()
                .ledger()
                .into_iter()
                .map(|stored| stored.record)
                .collect())
        })
        .await
    }

    async fn load_history(&self) -> Result<Vec<LogEntry>, StoreError> {
        self.with_store(|store| Ok(store.state().log.clone())).await
    }
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
