// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Read-only views for presentation code

use crate::catalog::ReferenceCatalog;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_core::{Comparison, LedgerRecord, LogEntry};

/// One line of the main list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionRow {
    pub barcode: String,
    pub quantity: u32,
    pub initial_quantity: u32,
    pub status: Comparison,
    /// Whether the barcode is still in the current catalog
    pub listed: bool,
    pub updated_at: DateTime<Utc>,
}

/// Most recently updated first, barcode ascending on ties.
///
/// Status always follows the record's own initial quantity, so a catalog
/// reload never changes what an existing row reports.
pub fn project(records: &[LedgerRecord], catalog: &ReferenceCatalog) -> Vec<ProjectionRow> {
    let mut rows: Vec<ProjectionRow> = records
        .iter()
        .map(|record| ProjectionRow {
            barcode: record.barcode.clone(),
            quantity: record.quantity,
            initial_quantity: record.initial_quantity,
            status: record.status(),
            listed: catalog.lookup(&record.barcode).is_some(),
            updated_at: record.updated_at,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.barcode.cmp(&b.barcode))
    });
    rows
}

/// One line of the history view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    pub barcode: String,
    pub quantity: u32,
    pub initial_quantity: u32,
    pub status: Comparison,
    pub timestamp: DateTime<Utc>,
}

/// History newest first
pub fn history_view(entries: &[LogEntry]) -> Vec<HistoryRow> {
    entries
        .iter()
        .rev()
        .map(|entry| HistoryRow {
            barcode: entry.barcode.clone(),
            quantity: entry.quantity,
            initial_quantity: entry.initial_quantity,
            status: entry.status(),
            timestamp: entry.timestamp,
        })
        .collect()
}

#[cfg(test)]
#[path = "projection_tests.rs"]
mod tests;
