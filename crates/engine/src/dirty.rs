// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dirty flag shared by the scan path and the persister

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set after every ledger mutation, taken by the persister before it
/// snapshots.
///
/// `mark` is a release store issued after the mutation and its log entry;
/// `take` is an acquire-release swap. A mutation published before a `take`
/// that returns true is visible to the snapshot that follows it. A mutation
/// published after leaves the flag set for the next flush.
#[derive(Clone, Default, Debug)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Clear the flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_clears_once() {
        let flag = DirtyFlag::new();
        assert!(!flag.take());

        flag.mark();
        flag.mark();
        assert!(flag.is_set());
        assert!(flag.take());
        assert!(!flag.take());
    }

    #[test]
    fn clones_share_the_flag() {
        let flag = DirtyFlag::new();
        let other = flag.clone();
        other.mark();
        assert!(flag.take());
        assert!(!other.is_set());
    }
}
