// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ledger records: the current scanned quantity per barcode

use crate::comparison::Comparison;
use crate::item::ReferenceItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current scan state of one barcode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub barcode: String,
    pub quantity: u32,
    /// Copied from the reference item when the record was created
    pub initial_quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerRecord {
    /// Record for the first scan of a reference item
    pub fn first_scan(item: &ReferenceItem, now: DateTime<Utc>) -> Self {
        Self::with_quantity(item, 1, now)
    }

    /// Record created with an explicit quantity (manual entry)
    pub fn with_quantity(item: &ReferenceItem, quantity: u32, now: DateTime<Utc>) -> Self {
        Self {
            barcode: item.barcode.clone(),
            quantity,
            initial_quantity: item.initial_quantity,
            created_at: now,
            updated_at: now,
        }
    }

    /// Count one more scan
    pub fn increment(&mut self, now: DateTime<Utc>) {
        self.quantity = self.quantity.saturating_add(1);
        self.updated_at = now;
    }

    /// Overwrite the quantity. Returns whether it changed.
    pub fn set_quantity(&mut self, quantity: u32, now: DateTime<Utc>) -> bool {
        let changed = self.quantity != quantity;
        self.quantity = quantity;
        self.updated_at = now;
        changed
    }

    pub fn status(&self) -> Comparison {
        Comparison::of(self.quantity, self.initial_quantity)
    }
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
