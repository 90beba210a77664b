// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scan ledger cache: one live record per scanned barcode

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use tally_core::{Clock, Event, EventBus, LedgerRecord, ReferenceItem};

type Slot = Arc<Mutex<LedgerRecord>>;

/// Authoritative in-memory ledger.
///
/// Each record sits behind its own mutex so a read-modify-write on one
/// barcode is atomic while scans of different barcodes only share the map's
/// read lock. Lock order is map then record; no path takes the map lock while
/// holding a record lock. A record is only inserted fully built, so readers
/// never observe a record with quantity zero.
pub struct ScanLedger<C: Clock> {
    records: RwLock<HashMap<String, Slot>>,
    clock: C,
    events: EventBus,
}

impl<C: Clock> ScanLedger<C> {
    pub fn new(clock: C, events: EventBus) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            clock,
            events,
        }
    }

    pub fn get(&self, barcode: &str) -> Option<LedgerRecord> {
        let slot = self.slot(barcode)?;
        let record = lock(&slot).clone();
        Some(record)
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every record, sorted by barcode
    pub fn snapshot(&self) -> Vec<LedgerRecord> {
        let mut records: Vec<LedgerRecord> = {
            let map = self.records.read().unwrap_or_else(|e| e.into_inner());
            map.values().map(|slot| lock(slot).clone()).collect()
        };
        records.sort_by(|a, b| a.barcode.cmp(&b.barcode));
        records
    }

    /// Seed from the durable store. Publishes nothing.
    pub fn restore(&self, records: Vec<LedgerRecord>) {
        let fresh: HashMap<String, Slot> = records
            .into_iter()
            .map(|record| (record.barcode.clone(), Arc::new(Mutex::new(record))))
            .collect();
        *self.records.write().unwrap_or_else(|e| e.into_inner()) = fresh;
    }

    /// Count one scan of `item`: create with quantity 1 or increment
    pub fn upsert_increment(&self, item: &ReferenceItem) -> LedgerRecord {
        self.increment_then(item, |_| ()).0
    }

    /// Set the quantity of a record by hand.
    ///
    /// A missing record is created only when `item` is given. Returns the
    /// updated record and whether the quantity changed, or `None` if there is
    /// nothing to edit.
    pub fn set_quantity(
        &self,
        barcode: &str,
        item: Option<&ReferenceItem>,
        quantity: u32,
    ) -> Option<(LedgerRecord, bool)> {
        self.set_quantity_then(barcode, item, quantity, |_, _| ())
            .map(|(record, changed, ())| (record, changed))
    }

    /// Increment and run `after` on the new state while the record is still
    /// locked.
    pub(crate) fn increment_then<R>(
        &self,
        item: &ReferenceItem,
        after: impl FnOnce(&LedgerRecord) -> R,
    ) -> (LedgerRecord, R) {
        if let Some(slot) = self.slot(&item.barcode) {
            let (record, out) = {
                let mut record = lock(&slot);
                record.increment(self.clock.now());
                let out = after(&record);
                (record.clone(), out)
            };
            self.publish_updated(&record.barcode);
            return (record, out);
        }

        let mut map = self.records.write().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = map.get(&item.barcode).cloned() {
            // Inserted by a concurrent scan between the two lookups
            drop(map);
            let (record, out) = {
                let mut record = lock(&slot);
                record.increment(self.clock.now());
                let out = after(&record);
                (record.clone(), out)
            };
            self.publish_updated(&record.barcode);
            return (record, out);
        }

        let record = LedgerRecord::first_scan(item, self.clock.now());
        let out = after(&record);
        map.insert(record.barcode.clone(), Arc::new(Mutex::new(record.clone())));
        drop(map);

        tracing::debug!(barcode = %record.barcode, "ledger record created");
        self.events.publish(Event::RecordInserted {
            barcode: record.barcode.clone(),
        });
        (record, out)
    }

    /// Manual set, running `after(record, changed)` under the record lock
    pub(crate) fn set_quantity_then<R>(
        &self,
        barcode: &str,
        item: Option<&ReferenceItem>,
        quantity: u32,
        after: impl FnOnce(&LedgerRecord, bool) -> R,
    ) -> Option<(LedgerRecord, bool, R)> {
        if let Some(slot) = self.slot(barcode) {
            let result = Self::set_locked(&slot, quantity, self.clock.now(), after);
            self.publish_updated(barcode);
            return Some(result);
        }

        let item = item?;
        let mut map = self.records.write().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = map.get(barcode).cloned() {
            drop(map);
            let result = Self::set_locked(&slot, quantity, self.clock.now(), after);
            self.publish_updated(barcode);
            return Some(result);
        }

        let record = LedgerRecord::with_quantity(item, quantity, self.clock.now());
        let out = after(&record, true);
        map.insert(record.barcode.clone(), Arc::new(Mutex::new(record.clone())));
        drop(map);

        self.events.publish(Event::RecordInserted {
            barcode: record.barcode.clone(),
        });
        Some((record, true, out))
    }

    fn set_locked<R>(
        slot: &Slot,
        quantity: u32,
        now: chrono::DateTime<chrono::Utc>,
        after: impl FnOnce(&LedgerRecord, bool) -> R,
    ) -> (LedgerRecord, bool, R) {
        let mut record = lock(slot);
        let changed = record.set_quantity(quantity, now);
        let out = after(&record, changed);
        (record.clone(), changed, out)
    }

    fn slot(&self, barcode: &str) -> Option<Slot> {
        self.records
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(barcode)
            .cloned()
    }

    fn publish_updated(&self, barcode: &str) {
        self.events.publish(Event::RecordUpdated {
            barcode: barcode.to_string(),
        });
    }
}

fn lock(slot: &Slot) -> std::sync::MutexGuard<'_, LedgerRecord> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

#[cfg(test)]
#[path = "ledger_tests.rs"]
mod tests;
