// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference catalog: barcode to expected quantity

use std::collections::HashMap;
use std::sync::RwLock;
use tally_core::ReferenceItem;

/// Expected quantities, replaced wholesale on every import
#[derive(Default)]
pub struct ReferenceCatalog {
    items: RwLock<HashMap<String, ReferenceItem>>,
}

impl ReferenceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole catalog. Later duplicates win. Returns the item count.
    pub fn load(&self, items: impl IntoIterator<Item = ReferenceItem>) -> usize {
        let fresh: HashMap<String, ReferenceItem> = items
            .into_iter()
            .map(|item| (item.barcode.clone(), item))
            .collect();
        let count = fresh.len();

        *self.items.write().unwrap_or_else(|e| e.into_inner()) = fresh;
        count
    }

    /// Look up a barcode; `None` means the item is not in the catalog
    pub fn lookup(&self, barcode: &str) -> Option<ReferenceItem> {
        self.items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(barcode)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.items.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All items sorted by barcode
    pub fn items(&self) -> Vec<ReferenceItem> {
        let mut items: Vec<_> = self
            .items
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        items.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        items
    }
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
