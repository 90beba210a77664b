// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host input lines: scanner reads and `:` commands

use std::path::PathBuf;
use thiserror::Error;

/// One line of host input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Raw scanner read, passed through untrimmed
    Scan(String),
    Set { barcode: String, quantity: u32 },
    Import(PathBuf),
    List,
    Log,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),
}

/// Parse a line.
///
/// A leading `:` followed by a known command name is a host command.
/// Everything else is a scan, including barcodes that start with `:`.
pub fn parse_line(line: &str) -> Result<Input, InputError> {
    let Some(command) = line.trim_start().strip_prefix(':') else {
        return Ok(Input::Scan(line.to_string()));
    };
    let command = command.trim_start();

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or_default();
    match name {
        "import" => {
            let path = command[name.len()..].trim();
            if path.is_empty() {
                return Err(InputError::Usage(":import <path>"));
            }
            Ok(Input::Import(PathBuf::from(path)))
        }
        "set" => {
            let (Some(barcode), Some(quantity), None) = (words.next(), words.next(), words.next())
            else {
                return Err(InputError::Usage(":set <barcode> <quantity>"));
            };
            let quantity = quantity
                .parse()
                .map_err(|_| InputError::InvalidQuantity(quantity.to_string()))?;
            Ok(Input::Set {
                barcode: barcode.to_string(),
                quantity,
            })
        }
        "list" => Ok(Input::List),
        "log" => Ok(Input::Log),
        _ => Ok(Input::Scan(line.to_string())),
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
