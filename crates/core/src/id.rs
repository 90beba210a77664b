// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log entry identifiers
//!
//! Every [`LogEntry`](crate::LogEntry) carries an id assigned when the scan is
//! accepted. The durable store deduplicates appends on it, which makes a
//! retried flush safe.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Generates unique log entry identifiers
pub trait IdGen: Clone + Send + Sync + 'static {
    fn next(&self) -> String;
}

/// UUID-based generator for production use
#[derive(Clone, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> String {
        Uuid::new_v4().hyphenated().to_string()
    }
}

/// Sequential generator for tests (`log-1`, `log-2`, ...).
///
/// Clones share one counter.
#[derive(Clone)]
pub struct SequentialIdGen {
    prefix: Arc<str>,
    issued: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: Arc::from(prefix),
            issued: Arc::default(),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("log")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> String {
        // Only uniqueness matters, not ordering with other memory
        let n = self.issued.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{n}", self.prefix)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
