// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change notifications published by the reconciliation core

use serde::{Deserialize, Serialize};

/// Events observed by presentation and host code.
///
/// Granularity is per barcode; observers re-read the ledger for field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// A barcode entered the ledger
    RecordInserted { barcode: String },

    /// An existing ledger record changed
    RecordUpdated { barcode: String },

    /// A history entry was appended
    LogAppended { barcode: String, quantity: u32 },

    /// A scan named a barcode the catalog does not know
    ScanRejected { barcode: String },

    /// The reference catalog was replaced
    CatalogLoaded { items: usize },

    /// A write-behind flush committed
    FlushCompleted { records: usize, entries: usize },

    /// A write-behind flush failed and will be retried
    FlushFailed { error: String },
}

impl Event {
    /// Colon-separated name used for subscription matching
    pub fn name(&self) -> String {
        match self {
            Event::RecordInserted { .. } => "ledger:inserted",
            Event::RecordUpdated { .. } => "ledger:updated",
            Event::LogAppended { .. } => "log:appended",
            Event::ScanRejected { .. } => "scan:rejected",
            Event::CatalogLoaded { .. } => "catalog:loaded",
            Event::FlushCompleted { .. } => "flush:completed",
            Event::FlushFailed { .. } => "flush:failed",
        }
        .to_string()
    }

    /// Barcode the event concerns, if any
    pub fn barcode(&self) -> Option<&str> {
        match self {
            Event::RecordInserted { barcode }
            | Event::RecordUpdated { barcode }
            | Event::LogAppended { barcode, .. }
            | Event::ScanRejected { barcode } => Some(barcode),
            Event::CatalogLoaded { .. }
            | Event::FlushCompleted { .. }
            | Event::FlushFailed { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
