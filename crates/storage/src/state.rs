// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use std::collections::{HashMap, HashSet};
use tally_core::{LedgerRecord, LogEntry, Operation, ReferenceItem};

/// A ledger record together with its durable id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub id: u64,
    pub record: LedgerRecord,
}

/// Materialized state built from WAL operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub catalog: HashMap<String, ReferenceItem>,
    pub records: HashMap<String, StoredRecord>,
    /// History in append order
    pub log: Vec<LogEntry>,
    log_ids: HashSet<String>,
    next_record_id: u64,
}

impl MaterializedState {
    pub fn get_record(&self, barcode: &str) -> Option<&StoredRecord> {
        self.records.get(barcode)
    }

    /// Id the next newly inserted record will receive
    pub fn next_record_id(&self) -> u64 {
        self.next_record_id.max(1)
    }

    pub fn contains_entry(&self, entry_id: &str) -> bool {
        self.log_ids.contains(entry_id)
    }

    /// True when an upsert of `record` would change nothing
    pub fn is_current(&self, record: &LedgerRecord) -> bool {
        self.records.get(&record.barcode).is_some_and(|stored| {
            stored.record.quantity == record.quantity
                && stored.record.updated_at == record.updated_at
        })
    }

    /// Catalog items sorted by barcode
    pub fn catalog_items(&self) -> Vec<ReferenceItem> {
        let mut items: Vec<_> = self.catalog.values().cloned().collect();
        items.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        items
    }

    /// Ledger records ordered by durable id
    pub fn ledger(&self) -> Vec<StoredRecord> {
        let mut records: Vec<_> = self.records.values().cloned().collect();
        records.sort_by_key(|r| r.id);
        records
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::CatalogReplace { items } => {
                self.catalog.clear();
                for item in items {
                    self.catalog.insert(item.barcode.clone(), item.clone());
                }
            }

            Operation::LedgerUpsert { id, record } => {
                match self.records.get_mut(&record.barcode) {
                    // Existing rows only take the mutable fields
                    Some(stored) => {
                        stored.record.quantity = record.quantity;
                        stored.record.updated_at = record.updated_at;
                    }
                    None => {
                        self.records.insert(
                            record.barcode.clone(),
                            StoredRecord {
                                id: *id,
                                record: record.clone(),
                            },
                        );
                    }
                }
                self.next_record_id = self.next_record_id.max(id + 1);
            }

            Operation::LogAppend { entry } => {
                if self.log_ids.insert(entry.id.clone()) {
                    self.log.push(entry.clone());
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
