// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::store::FakeStoreAdapter;
use chrono::Utc;
use std::sync::{Arc, Mutex};

/// Shared buffer the fmt layer writes into
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl std::io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Capture trace output on this thread until the guard drops.
///
/// `#[tokio::test]` runs on a current-thread runtime, so the guard covers
/// everything the test awaits.
fn capture() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

fn record(barcode: &str) -> LedgerRecord {
    LedgerRecord::first_scan(&ReferenceItem::new(barcode, 3), Utc::now())
}

#[tokio::test]
async fn traced_store_delegates() {
    let fake = FakeStoreAdapter::new();
    let traced = TracedStoreAdapter::new(fake.clone());

    let id = traced.upsert_ledger_record(&record("A")).await.unwrap();

    assert_eq!(id, 1);
    assert_eq!(fake.record("A").unwrap().quantity, 1);
    assert_eq!(traced.inner().calls().len(), 1);
}

#[tokio::test]
async fn traced_upsert_logs_span_and_timing() {
    let (buffer, _guard) = capture();
    let traced = TracedStoreAdapter::new(FakeStoreAdapter::new());

    let result = traced.upsert_ledger_record(&record("15060715")).await;
    let logs = buffer.text();

    assert!(result.is_ok(), "upsert should succeed: {:?}", result);
    for expected in ["store.upsert", "15060715", "elapsed_ms"] {
        assert!(logs.contains(expected), "missing {expected:?} in:\n{logs}");
    }
}

#[tokio::test]
async fn traced_append_logs_failure() {
    let (buffer, _guard) = capture();
    let fake = FakeStoreAdapter::new();
    fake.fail_next(1);
    let traced = TracedStoreAdapter::new(fake);
    let entry = LogEntry::from_record("log-9".to_string(), &record("A"), Utc::now());

    let result = traced.append_log_entry(&entry).await;
    let logs = buffer.text();

    assert!(result.is_err());
    for expected in ["append failed", "log-9"] {
        assert!(logs.contains(expected), "missing {expected:?} in:\n{logs}");
    }
}

#[tokio::test]
async fn traced_replace_catalog_logs_item_count() {
    let (buffer, _guard) = capture();
    let traced = TracedStoreAdapter::new(FakeStoreAdapter::new());

    let result = traced
        .replace_catalog(&[ReferenceItem::new("A", 1), ReferenceItem::new("B", 2)])
        .await;
    let logs = buffer.text();

    assert!(result.is_ok());
    for expected in ["store.replace_catalog", "items=2", "catalog stored"] {
        assert!(logs.contains(expected), "missing {expected:?} in:\n{logs}");
    }
}
