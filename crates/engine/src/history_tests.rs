// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};

fn entry(id: &str, barcode: &str, quantity: u32) -> LogEntry {
    LogEntry {
        id: id.to_string(),
        barcode: barcode.to_string(),
        quantity,
        initial_quantity: 5,
        scanned_record_id: None,
        timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap(),
    }
}

#[test]
fn append_keeps_order() {
    let log = HistoryLog::new();
    log.append(entry("log-1", "A", 1));
    log.append(entry("log-2", "B", 1));
    log.append(entry("log-3", "A", 2));

    let ids: Vec<_> = log.entries().into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["log-1", "log-2", "log-3"]);

    let quantities: Vec<_> = log.for_barcode("A").iter().map(|e| e.quantity).collect();
    assert_eq!(quantities, vec![1, 2]);
}

#[test]
fn unflushed_tail_and_cursor() {
    let log = HistoryLog::new();
    log.append(entry("log-1", "A", 1));
    log.append(entry("log-2", "A", 2));

    let (cursor, pending) = log.unflushed();
    assert_eq!(cursor, 2);
    assert_eq!(pending.len(), 2);

    // Appended while the flush is in flight
    log.append(entry("log-3", "A", 3));
    log.mark_flushed(cursor);

    let (cursor, pending) = log.unflushed();
    assert_eq!(cursor, 3);
    assert_eq!(pending, vec![entry("log-3", "A", 3)]);
    assert_eq!(log.pending_count(), 1);
}

#[test]
fn cursor_never_moves_back() {
    let log = HistoryLog::new();
    log.append(entry("log-1", "A", 1));
    log.append(entry("log-2", "A", 2));

    log.mark_flushed(2);
    log.mark_flushed(1);
    assert_eq!(log.pending_count(), 0);

    log.mark_flushed(99);
    assert_eq!(log.pending_count(), 0);
    assert_eq!(log.len(), 2);
}

#[test]
fn restore_marks_everything_flushed() {
    let log = HistoryLog::new();
    log.append(entry("stale", "Z", 1));

    log.restore(vec![entry("log-1", "A", 1), entry("log-2", "A", 2)]);

    assert_eq!(log.len(), 2);
    assert_eq!(log.pending_count(), 0);
    assert!(log.for_barcode("Z").is_empty());
}
