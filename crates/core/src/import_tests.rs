// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn reads_id_barcode_quantity_layout() {
    let content = "Id,Barcode,Quantity\n1,1234567890,10\n2,15060715,5\n";
    let items = parse_catalog(content).unwrap();

    assert_eq!(
        items,
        vec![
            ReferenceItem::new("1234567890", 10),
            ReferenceItem::new("15060715", 5),
        ]
    );
}

#[test]
fn reads_two_column_layout() {
    let content = "barcode,quantity\n0101234567891231,3\n";
    let items = parse_catalog(content).unwrap();
    assert_eq!(items, vec![ReferenceItem::new("0101234567891231", 3)]);
}

#[parameterized(
    tab = { "Id\tBarcode\tQuantity\n1\tA\t4\n" },
    semicolon = { "Id;Barcode;Quantity\n1;A;4\n" },
    comma = { "Id,Barcode,Quantity\n1,A,4\n" },
)]
fn detects_delimiter(content: &str) {
    let items = parse_catalog(content).unwrap();
    assert_eq!(items, vec![ReferenceItem::new("A", 4)]);
}

#[test]
fn skips_blank_barcodes() {
    let content = "Id,Barcode,Quantity\n1,,10\n2,   ,3\n3,B,1\n";
    let items = parse_catalog(content).unwrap();
    assert_eq!(items, vec![ReferenceItem::new("B", 1)]);
}

#[test]
fn last_duplicate_wins_in_first_position() {
    let content = "Id,Barcode,Quantity\n1,A,1\n2,B,2\n3,A,9\n";
    let items = parse_catalog(content).unwrap();
    assert_eq!(
        items,
        vec![ReferenceItem::new("A", 9), ReferenceItem::new("B", 2)]
    );
}

#[test]
fn accepts_whole_float_quantities() {
    let content = "Id,Barcode,Quantity\n1,A,5.0\n";
    let items = parse_catalog(content).unwrap();
    assert_eq!(items, vec![ReferenceItem::new("A", 5)]);
}

#[parameterized(
    negative = { "-1" },
    fractional = { "2.5" },
    text = { "lots" },
    blank = { "" },
)]
fn rejects_bad_quantity(value: &str) {
    let content = format!("Id,Barcode,Quantity\n1,A,{}\n", value);
    let err = parse_catalog(&content).unwrap_err();
    assert!(
        matches!(&err, ImportError::InvalidQuantity { line: 2, .. }),
        "unexpected error: {}",
        err
    );
}

#[test]
fn rejects_single_column_rows() {
    let content = "Barcode\nA\n";
    let err = parse_catalog(content).unwrap_err();
    assert!(matches!(err, ImportError::MissingColumns { found: 1, .. }));
}

#[test]
fn header_only_is_empty_catalog() {
    assert!(parse_catalog("Id,Barcode,Quantity\n").unwrap().is_empty());
}

#[test]
fn read_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stock.csv");
    std::fs::write(&path, "Id,Barcode,Quantity\n1,A,2\n").unwrap();

    let items = read_catalog(&path).unwrap();
    assert_eq!(items, vec![ReferenceItem::new("A", 2)]);
}

#[test]
fn read_catalog_missing_file() {
    let err = read_catalog(Path::new("/nonexistent/stock.csv")).unwrap_err();
    assert!(matches!(err, ImportError::Io(_)));
}
