// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::TimeZone;
use tally_core::ReferenceItem;

fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, minute, 0).unwrap()
}

fn record(barcode: &str, quantity: u32, initial: u32, minute: u32) -> LedgerRecord {
    let mut record =
        LedgerRecord::with_quantity(&ReferenceItem::new(barcode, initial), quantity, at(0));
    record.updated_at = at(minute);
    record
}

#[test]
fn newest_first_with_barcode_tie_break() {
    let catalog = ReferenceCatalog::new();
    let records = vec![
        record("C", 1, 1, 1),
        record("B", 1, 1, 5),
        record("A", 1, 1, 5),
        record("D", 1, 1, 3),
    ];

    let order: Vec<String> = project(&records, &catalog)
        .into_iter()
        .map(|row| row.barcode)
        .collect();

    assert_eq!(order, vec!["A", "B", "D", "C"]);
}

#[test]
fn rows_carry_status() {
    let catalog = ReferenceCatalog::new();
    let records = vec![
        record("below", 3, 5, 1),
        record("equal", 5, 5, 2),
        record("above", 7, 5, 3),
    ];

    let rows = project(&records, &catalog);

    let statuses: Vec<(&str, Comparison)> = rows
        .iter()
        .map(|r| (r.barcode.as_str(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("above", Comparison::Above),
            ("equal", Comparison::Equal),
            ("below", Comparison::Below),
        ]
    );
}

#[test]
fn status_follows_record_after_catalog_reload() {
    let catalog = ReferenceCatalog::new();
    catalog.load(vec![ReferenceItem::new("15060715", 1)]);
    let records = vec![record("15060715", 3, 5, 1), record("GONE", 3, 5, 2)];

    let rows = project(&records, &catalog);

    for (row, record) in rows.iter().rev().zip(&records) {
        assert_eq!(row.barcode, record.barcode);
        assert_eq!(row.initial_quantity, record.initial_quantity);
        assert_eq!(row.status, record.status());
        assert_eq!(row.status, Comparison::Below);
    }
    let listed: Vec<(&str, bool)> = rows.iter().map(|r| (r.barcode.as_str(), r.listed)).collect();
    assert_eq!(listed, vec![("GONE", false), ("15060715", true)]);
}

#[test]
fn history_view_is_newest_first() {
    let base = record("A", 1, 2, 1);
    let entries: Vec<LogEntry> = (1..=3)
        .map(|n| {
            let mut r = base.clone();
            r.quantity = n;
            LogEntry::from_record(format!("log-{n}"), &r, at(n))
        })
        .collect();

    let rows = history_view(&entries);

    let quantities: Vec<u32> = rows.iter().map(|r| r.quantity).collect();
    assert_eq!(quantities, vec![3, 2, 1]);
    assert_eq!(rows[0].status, Comparison::Above);
    assert_eq!(rows[2].timestamp, at(1));
}
