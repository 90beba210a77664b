// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! History log entries

use crate::comparison::Comparison;
use crate::record::LedgerRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One accepted quantity change, captured after it was applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    pub barcode: String,
    /// Quantity after the change
    pub quantity: u32,
    pub initial_quantity: u32,
    /// Durable id of the ledger record; unset until the record is persisted
    #[serde(default)]
    pub scanned_record_id: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    pub fn from_record(id: String, record: &LedgerRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            id,
            barcode: record.barcode.clone(),
            quantity: record.quantity,
            initial_quantity: record.initial_quantity,
            scanned_record_id: None,
            timestamp,
        }
    }

    pub fn status(&self) -> Comparison {
        Comparison::of(self.quantity, self.initial_quantity)
    }
}

#[cfg(test)]
#[path = "log_entry_tests.rs"]
mod tests;
