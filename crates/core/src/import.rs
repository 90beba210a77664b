// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reference catalog import from delimited spreadsheet exports
//!
//! The first row is a header. Three or more columns are read as
//! `id, barcode, quantity` (the id column is ignored); two columns as
//! `barcode, quantity`. Comma, tab and semicolon delimiters are detected from
//! the header line.

use crate::item::ReferenceItem;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Errors from reading an import file
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected at least 2 columns, found {found}")]
    MissingColumns { line: u64, found: usize },
    #[error("line {line}: invalid quantity {value:?}")]
    InvalidQuantity { line: u64, value: String },
}

/// Read and parse an import file
pub fn read_catalog(path: &Path) -> Result<Vec<ReferenceItem>, ImportError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog(&content)
}

/// Parse import rows into reference items.
///
/// Rows with a blank barcode are skipped. A barcode appearing more than once
/// keeps its first position and its last quantity.
pub fn parse_catalog(content: &str) -> Result<Vec<ReferenceItem>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(content))
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut items: Vec<ReferenceItem> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in reader.records() {
        let row = row?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        let (barcode, quantity) = match row.len() {
            0 | 1 if row.iter().all(str::is_empty) => continue,
            0 | 1 => {
                return Err(ImportError::MissingColumns {
                    line,
                    found: row.len(),
                })
            }
            2 => (&row[0], &row[1]),
            _ => (&row[1], &row[2]),
        };

        if barcode.is_empty() {
            tracing::debug!(line, "skipping row without barcode");
            continue;
        }

        let initial_quantity = parse_quantity(quantity).ok_or_else(|| {
            ImportError::InvalidQuantity {
                line,
                value: quantity.to_string(),
            }
        })?;

        match positions.get(barcode) {
            Some(&index) => items[index].initial_quantity = initial_quantity,
            None => {
                positions.insert(barcode.to_string(), items.len());
                items.push(ReferenceItem::new(barcode, initial_quantity));
            }
        }
    }

    Ok(items)
}

/// Spreadsheet exports write whole numbers as `5` or `5.0`
fn parse_quantity(value: &str) -> Option<u32> {
    if let Ok(n) = value.parse::<u32>() {
        return Some(n);
    }
    let float = value.parse::<f64>().ok()?;
    if float.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&float) {
        Some(float as u32)
    } else {
        None
    }
}

fn detect_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    [b'\t', b';', b',']
        .into_iter()
        .max_by_key(|d| header.bytes().filter(|b| b == d).count())
        .filter(|d| header.as_bytes().contains(d))
        .unwrap_or(b',')
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
