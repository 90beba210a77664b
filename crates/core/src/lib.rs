// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tally-core: domain types for the stocktake reconciliation core
//!
//! This crate provides:
//! - Reference items, ledger records and history entries
//! - The derived quantity-vs-initial comparison
//! - Clock and id abstractions for deterministic tests
//! - The change notification bus and WAL operations
//! - Catalog import from spreadsheet exports

pub mod clock;
pub mod comparison;
pub mod event;
pub mod events;
pub mod id;
pub mod import;
pub mod item;
pub mod log_entry;
pub mod operation;
pub mod record;

pub use clock::{elapsed_ms, Clock, FakeClock, SystemClock};
pub use comparison::Comparison;
pub use event::Event;
pub use events::{EventBus, EventPattern, EventReceiver, SubscriberId, Subscription};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use import::{parse_catalog, read_catalog, ImportError};
pub use item::{normalize_barcode, ReferenceItem};
pub use log_entry::LogEntry;
pub use operation::Operation;
pub use record::LedgerRecord;
