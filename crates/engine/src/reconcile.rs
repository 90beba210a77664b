// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation engine: turns raw scanner input into ledger mutations

use crate::catalog::ReferenceCatalog;
use crate::dirty::DirtyFlag;
use crate::history::HistoryLog;
use crate::ledger::ScanLedger;
use std::sync::Arc;
use tally_core::{normalize_barcode, Clock, Event, EventBus, IdGen, LedgerRecord, LogEntry};
use thiserror::Error;

/// Why a scan did not change the ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("empty scan input")]
    EmptyInput,
    #[error("barcode not in catalog: {0}")]
    UnknownBarcode(String),
}

impl Rejection {
    /// Whether the operator should be told about it
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Rejection::UnknownBarcode(_))
    }
}

/// Result of a scan or a manual edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Accepted {
        record: LedgerRecord,
        entry: LogEntry,
    },
    /// Manual edit to the quantity already held; nothing logged
    Unchanged { record: LedgerRecord },
    Rejected(Rejection),
}

impl Outcome {
    pub fn record(&self) -> Option<&LedgerRecord> {
        match self {
            Outcome::Accepted { record, .. } | Outcome::Unchanged { record } => Some(record),
            Outcome::Rejected(_) => None,
        }
    }
}

/// Shared state the reconciler mutates
pub struct ReconcilerParts<C: Clock> {
    pub catalog: Arc<ReferenceCatalog>,
    pub ledger: Arc<ScanLedger<C>>,
    pub history: Arc<HistoryLog>,
    pub dirty: DirtyFlag,
    pub events: EventBus,
}

pub struct Reconciler<C: Clock, I: IdGen> {
    catalog: Arc<ReferenceCatalog>,
    ledger: Arc<ScanLedger<C>>,
    history: Arc<HistoryLog>,
    dirty: DirtyFlag,
    events: EventBus,
    id_gen: I,
}

impl<C: Clock, I: IdGen> Reconciler<C, I> {
    pub fn new(parts: ReconcilerParts<C>, id_gen: I) -> Self {
        Self {
            catalog: parts.catalog,
            ledger: parts.ledger,
            history: parts.history,
            dirty: parts.dirty,
            events: parts.events,
            id_gen,
        }
    }

    /// Count one scan.
    ///
    /// Never blocks on persistence. The history entry is appended while the
    /// record is locked so entries for one barcode follow increment order.
    pub fn record_scan(&self, raw: &str) -> Outcome {
        let Some(barcode) = normalize_barcode(raw) else {
            return Outcome::Rejected(Rejection::EmptyInput);
        };

        let Some(item) = self.catalog.lookup(barcode) else {
            tracing::info!(barcode, "scan rejected: not in catalog");
            self.events.publish(Event::ScanRejected {
                barcode: barcode.to_string(),
            });
            return Outcome::Rejected(Rejection::UnknownBarcode(barcode.to_string()));
        };

        let (record, entry) = self.ledger.increment_then(&item, |record| self.log(record));
        self.accepted(record, entry)
    }

    /// Manual edit from the details view; logs only when the quantity changes
    pub fn set_quantity(&self, raw: &str, quantity: u32) -> Outcome {
        let Some(barcode) = normalize_barcode(raw) else {
            return Outcome::Rejected(Rejection::EmptyInput);
        };
        let item = self.catalog.lookup(barcode);

        let result = self
            .ledger
            .set_quantity_then(barcode, item.as_ref(), quantity, |record, changed| {
                changed.then(|| self.log(record))
            });

        match result {
            None => Outcome::Rejected(Rejection::UnknownBarcode(barcode.to_string())),
            Some((record, _, Some(entry))) => self.accepted(record, entry),
            Some((record, _, None)) => {
                self.dirty.mark();
                Outcome::Unchanged { record }
            }
        }
    }

    fn log(&self, record: &LedgerRecord) -> LogEntry {
        let entry = LogEntry::from_record(self.id_gen.next(), record, record.updated_at);
        self.history.append(entry.clone());
        entry
    }

    fn accepted(&self, record: LedgerRecord, entry: LogEntry) -> Outcome {
        self.dirty.mark();
        tracing::debug!(
            barcode = %record.barcode,
            quantity = record.quantity,
            status = %record.status(),
            "scan accepted"
        );
        self.events.publish(Event::LogAppended {
            barcode: record.barcode.clone(),
            quantity: record.quantity,
        });
        Outcome::Accepted { record, entry }
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
