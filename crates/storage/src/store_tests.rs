// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap()
}

fn make_store() -> (WalStore, TempDir) {
    let tmp = TempDir::new().unwrap();
    let store = WalStore::open(&tmp.path().join("wal").join("store.wal")).unwrap();
    (store, tmp)
}

fn scanned(barcode: &str, quantity: u32, minute: u32) -> LedgerRecord {
    let mut record = LedgerRecord::with_quantity(&ReferenceItem::new(barcode, 3), quantity, at(0));
    record.updated_at = at(minute);
    record
}

#[test]
fn upsert_assigns_stable_ids() {
    let (mut store, _tmp) = make_store();

    let a = store.upsert_ledger_record(&scanned("A", 1, 0)).unwrap();
    let b = store.upsert_ledger_record(&scanned("B", 1, 0)).unwrap();
    let a_again = store.upsert_ledger_record(&scanned("A", 2, 1)).unwrap();

    assert_eq!(a, 1);
    assert_eq!(b, 2);
    assert_eq!(a_again, 1);
    assert_eq!(store.state().get_record("A").unwrap().record.quantity, 2);
}

#[test]
fn identical_upsert_writes_nothing() {
    let (mut store, _tmp) = make_store();
    store.upsert_ledger_record(&scanned("A", 1, 0)).unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    store.upsert_ledger_record(&scanned("A", 1, 0)).unwrap();

    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn duplicate_append_is_ignored() {
    let (mut store, _tmp) = make_store();
    let entry = LogEntry::from_record("log-1".to_string(), &scanned("A", 1, 0), at(0));

    assert!(store.append_log_entry(&entry).unwrap());
    assert!(!store.append_log_entry(&entry).unwrap());
    assert_eq!(store.state().log.len(), 1);
}

#[test]
fn reopen_restores_everything() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.wal");

    {
        let mut store = WalStore::open(&path).unwrap();
        store
            .replace_catalog(&[ReferenceItem::new("A", 3), ReferenceItem::new("B", 1)])
            .unwrap();
        store.upsert_ledger_record(&scanned("A", 2, 4)).unwrap();
        let mut entry = LogEntry::from_record("log-1".to_string(), &scanned("A", 2, 4), at(4));
        entry.scanned_record_id = Some(1);
        store.append_log_entry(&entry).unwrap();
    }

    let store = WalStore::open(&path).unwrap();
    let state = store.state();
    assert_eq!(state.catalog.len(), 2);
    assert_eq!(state.get_record("A").unwrap().record.quantity, 2);
    assert_eq!(state.log.len(), 1);
    assert_eq!(state.log[0].scanned_record_id, Some(1));
    assert_eq!(state.next_record_id(), 2);
}

#[test]
fn retry_after_torn_write_reopens_cleanly() {
    use std::io::Write;

    let (mut store, _tmp) = make_store();
    store.upsert_ledger_record(&scanned("A", 1, 0)).unwrap();

    let mut torn = std::fs::OpenOptions::new()
        .append(true)
        .open(store.path())
        .unwrap();
    torn.write_all(b"{\"seq\":2,\"op\":{\"LedgerUp").unwrap();
    drop(torn);

    store.upsert_ledger_record(&scanned("A", 2, 1)).unwrap();
    store.upsert_ledger_record(&scanned("B", 1, 1)).unwrap();

    let reopened = WalStore::open(store.path()).unwrap();
    let state = reopened.state();
    assert_eq!(state.get_record("A").unwrap().record.quantity, 2);
    assert_eq!(state.get_record("B").unwrap().record.quantity, 1);
}

#[test]
fn compact_keeps_state_and_shrinks_log() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("store.wal");

    {
        let mut store = WalStore::open(&path).unwrap();
        store.replace_catalog(&[ReferenceItem::new("A", 3)]).unwrap();
        for minute in 0..10 {
            store
                .upsert_ledger_record(&scanned("A", minute + 1, minute))
                .unwrap();
        }
        store.compact().unwrap();
        // Still writable after compaction
        store.upsert_ledger_record(&scanned("B", 1, 20)).unwrap();
    }

    let ops = crate::Wal::replay(&path).unwrap();
    assert_eq!(ops.len(), 3);

    let store = WalStore::open(&path).unwrap();
    assert_eq!(store.state().get_record("A").unwrap().record.quantity, 10);
    assert_eq!(store.state().get_record("B").unwrap().id, 2);
}
