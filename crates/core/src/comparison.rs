// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scanned quantity compared against the reference quantity

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Where a scanned quantity sits relative to the expected (initial) quantity.
///
/// Always derived from the current numbers, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Below,
    Equal,
    Above,
}

impl Comparison {
    pub fn of(quantity: u32, initial_quantity: u32) -> Self {
        match quantity.cmp(&initial_quantity) {
            Ordering::Less => Comparison::Below,
            Ordering::Equal => Comparison::Equal,
            Ordering::Greater => Comparison::Above,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Below => "below",
            Comparison::Equal => "equal",
            Comparison::Above => "above",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "comparison_tests.rs"]
mod tests;
