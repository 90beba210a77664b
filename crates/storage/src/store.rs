// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WAL-backed durable store for the catalog, ledger and history

use crate::state::MaterializedState;
use crate::wal::{Wal, WalError};
use std::path::{Path, PathBuf};
use tally_core::{LedgerRecord, LogEntry, Operation, ReferenceItem};

/// Durable store: every mutation is logged before it is applied.
///
/// Upserts that would not change the stored row and appends of an entry id
/// already present write nothing, so a retried flush is harmless.
pub struct WalStore {
    path: PathBuf,
    wal: Wal,
    state: MaterializedState,
}

impl WalStore {
    /// Open the store, replaying the WAL into memory
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let wal = Wal::open(path)?;
        let mut state = MaterializedState::default();
        for op in Wal::replay(path)? {
            state.apply(&op);
        }

        tracing::debug!(
            path = %path.display(),
            catalog = state.catalog.len(),
            records = state.records.len(),
            log = state.log.len(),
            "store opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            wal,
            state,
        })
    }

    pub fn state(&self) -> &MaterializedState {
        &self.state
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert or update the record for its barcode. Returns the durable id.
    pub fn upsert_ledger_record(&mut self, record: &LedgerRecord) -> Result<u64, WalError> {
        let id = match self.state.get_record(&record.barcode) {
            Some(stored) if self.state.is_current(record) => return Ok(stored.id),
            Some(stored) => stored.id,
            None => self.state.next_record_id(),
        };

        self.commit(Operation::LedgerUpsert {
            id,
            record: record.clone(),
        })?;
        Ok(id)
    }

    /// Append a history entry. Returns false if the entry was already stored.
    pub fn append_log_entry(&mut self, entry: &LogEntry) -> Result<bool, WalError> {
        if self.state.contains_entry(&entry.id) {
            return Ok(false);
        }
        self.commit(Operation::LogAppend {
            entry: entry.clone(),
        })?;
        Ok(true)
    }

    /// Replace the stored reference catalog
    pub fn replace_catalog(&mut self, items: &[ReferenceItem]) -> Result<(), WalError> {
        self.commit(Operation::CatalogReplace {
            items: items.to_vec(),
        })
    }

    /// Rewrite the WAL as the minimal set of operations for the current state
    pub fn compact(&mut self) -> Result<(), WalError> {
        let mut ops = Vec::with_capacity(1 + self.state.records.len() + self.state.log.len());
        ops.push(Operation::CatalogReplace {
            items: self.state.catalog_items(),
        });
        for stored in self.state.ledger() {
            ops.push(Operation::LedgerUpsert {
                id: stored.id,
                record: stored.record,
            });
        }
        for entry in &self.state.log {
            ops.push(Operation::LogAppend {
                entry: entry.clone(),
            });
        }

        let before = self.wal.sequence();
        let tmp = self.path.with_extension("compact");
        if tmp.exists() {
            std::fs::remove_file(&tmp)?;
        }
        {
            let mut fresh = Wal::open(&tmp)?;
            fresh.append_all(&ops)?;
        }
        std::fs::rename(&tmp, &self.path)?;
        self.wal = Wal::open(&self.path)?;

        tracing::info!(before, after = self.wal.sequence(), "WAL compacted");
        Ok(())
    }

    fn commit(&mut self, op: Operation) -> Result<(), WalError> {
        self.wal.append(&op)?;
        self.state.apply(&op);
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
