// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn stock() -> Vec<ReferenceItem> {
    vec![
        ReferenceItem::new("1234567890", 10),
        ReferenceItem::new("15060715", 5),
        ReferenceItem::new("10123456789012345672", 8),
    ]
}

#[test]
fn lookup_known_and_unknown() {
    let catalog = ReferenceCatalog::new();
    catalog.load(stock());

    assert_eq!(
        catalog.lookup("15060715"),
        Some(ReferenceItem::new("15060715", 5))
    );
    assert_eq!(catalog.lookup("UNKNOWN123"), None);
}

#[test]
fn reload_is_idempotent() {
    let catalog = ReferenceCatalog::new();
    catalog.load(stock());
    let first = catalog.items();

    catalog.load(stock());

    assert_eq!(catalog.items(), first);
    assert_eq!(catalog.len(), 3);
}

#[test]
fn reload_drops_stale_barcodes() {
    let catalog = ReferenceCatalog::new();
    catalog.load(stock());

    let count = catalog.load(vec![ReferenceItem::new("0101234567891231", 3)]);

    assert_eq!(count, 1);
    assert_eq!(catalog.lookup("1234567890"), None);
    assert_eq!(
        catalog.items(),
        vec![ReferenceItem::new("0101234567891231", 3)]
    );
}

#[test]
fn duplicate_in_one_load_last_wins() {
    let catalog = ReferenceCatalog::new();
    let count = catalog.load(vec![ReferenceItem::new("A", 1), ReferenceItem::new("A", 7)]);

    assert_eq!(count, 1);
    assert_eq!(catalog.lookup("A").unwrap().initial_quantity, 7);
}

#[test]
fn empty_load_clears() {
    let catalog = ReferenceCatalog::new();
    catalog.load(stock());
    catalog.load(Vec::new());
    assert!(catalog.is_empty());
}
