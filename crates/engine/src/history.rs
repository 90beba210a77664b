// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Append-only scan history with a write-behind cursor

use std::sync::Mutex;
use tally_core::LogEntry;

#[derive(Default)]
struct HistoryState {
    entries: Vec<LogEntry>,
    /// Entries before this index are durable
    flushed: usize,
}

/// In-memory history log.
///
/// Entries are never mutated or removed once appended. The persister reads
/// the unflushed tail and advances the cursor only after the store accepted
/// every entry in it.
#[derive(Default)]
pub struct HistoryLog {
    state: Mutex<HistoryState>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the log with entries loaded from the durable store
    pub fn restore(&self, entries: Vec<LogEntry>) {
        let mut state = self.lock();
        state.flushed = entries.len();
        state.entries = entries;
    }

    pub fn append(&self, entry: LogEntry) {
        self.lock().entries.push(entry);
    }

    /// All entries in append order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().entries.clone()
    }

    pub fn for_barcode(&self, barcode: &str) -> Vec<LogEntry> {
        self.lock()
            .entries
            .iter()
            .filter(|e| e.barcode == barcode)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries not yet durable, with the cursor to pass to [`Self::mark_flushed`]
    pub fn unflushed(&self) -> (usize, Vec<LogEntry>) {
        let state = self.lock();
        let end = state.entries.len();
        (end, state.entries[state.flushed..end].to_vec())
    }

    /// Advance the flush cursor. Never moves backwards.
    pub fn mark_flushed(&self, cursor: usize) {
        let mut state = self.lock();
        let cursor = cursor.min(state.entries.len());
        if cursor > state.flushed {
            state.flushed = cursor;
        }
    }

    pub fn pending_count(&self) -> usize {
        let state = self.lock();
        state.entries.len() - state.flushed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
