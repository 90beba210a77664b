// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log

use crate::item::ReferenceItem;
use crate::log_entry::LogEntry;
use crate::record::LedgerRecord;
use serde::{Deserialize, Serialize};

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Replace the whole reference catalog
    CatalogReplace { items: Vec<ReferenceItem> },

    /// Insert or update the ledger record for `record.barcode`
    LedgerUpsert { id: u64, record: LedgerRecord },

    /// Append a history entry
    LogAppend { entry: LogEntry },
}

impl Operation {
    /// Short name for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Operation::CatalogReplace { .. } => "catalog_replace",
            Operation::LedgerUpsert { .. } => "ledger_upsert",
            Operation::LogAppend { .. } => "log_append",
        }
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
