// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::Utc;

fn record(barcode: &str, quantity: u32) -> LedgerRecord {
    LedgerRecord::with_quantity(&ReferenceItem::new(barcode, 2), quantity, Utc::now())
}

#[tokio::test]
async fn fake_store_upserts_by_barcode() {
    let store = FakeStoreAdapter::new();

    assert_eq!(store.upsert_ledger_record(&record("A", 1)).await.unwrap(), 1);
    assert_eq!(store.upsert_ledger_record(&record("B", 1)).await.unwrap(), 2);
    assert_eq!(store.upsert_ledger_record(&record("A", 3)).await.unwrap(), 1);

    assert_eq!(store.record("A").unwrap().quantity, 3);
    assert_eq!(store.load_ledger().await.unwrap().len(), 2);
}

#[tokio::test]
async fn fake_store_injected_failures_are_consumed() {
    let store = FakeStoreAdapter::new();
    store.fail_next(1);

    let first = store.upsert_ledger_record(&record("A", 1)).await;
    assert!(matches!(first, Err(StoreError::Unavailable(_))));
    assert!(store.record("A").is_none());

    store.upsert_ledger_record(&record("A", 1)).await.unwrap();
    assert!(store.record("A").is_some());
    assert_eq!(store.calls().len(), 2);
}

#[tokio::test]
async fn fake_store_append_deduplicates() {
    let store = FakeStoreAdapter::new();
    let entry = LogEntry::from_record("log-1".to_string(), &record("A", 1), Utc::now());

    store.append_log_entry(&entry).await.unwrap();
    store.append_log_entry(&entry).await.unwrap();

    assert_eq!(store.history().len(), 1);
    assert_eq!(
        store.calls(),
        vec![
            StoreCall::Append {
                entry_id: "log-1".to_string()
            },
            StoreCall::Append {
                entry_id: "log-1".to_string()
            },
        ]
    );
}
