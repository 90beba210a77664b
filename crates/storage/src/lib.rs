// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Durable storage: write-ahead log and the state it materializes

mod state;
mod store;
mod wal;

pub use state::{MaterializedState, StoredRecord};
pub use store::WalStore;
pub use wal::{Wal, WalError};
