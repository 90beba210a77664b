// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference items and barcode normalization

use serde::{Deserialize, Serialize};

/// Expected stock for one barcode, as loaded from the reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub barcode: String,
    pub initial_quantity: u32,
}

impl ReferenceItem {
    pub fn new(barcode: impl Into<String>, initial_quantity: u32) -> Self {
        Self {
            barcode: barcode.into(),
            initial_quantity,
        }
    }
}

/// Normalize raw scanner input into a barcode.
///
/// Scanners in keyboard-wedge mode deliver surrounding whitespace and line
/// terminators. Returns `None` when nothing remains.
pub fn normalize_barcode(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
