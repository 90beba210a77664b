// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Tally reconciliation engine

mod catalog;
mod dirty;
mod error;
mod history;
mod ledger;
mod persister;
pub mod projection;
mod reconcile;
mod session;

pub use catalog::ReferenceCatalog;
pub use dirty::DirtyFlag;
pub use error::EngineError;
pub use history::HistoryLog;
pub use ledger::ScanLedger;
pub use persister::{FlushReport, Persister, PersisterHandle, DEFAULT_FLUSH_INTERVAL};
pub use projection::{HistoryRow, ProjectionRow};
pub use reconcile::{Outcome, Reconciler, ReconcilerParts, Rejection};
pub use session::{ScanSession, SessionDeps};
