// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Change notification channel
//!
//! The bus is handed to the ledger, reconciler and persister at construction;
//! observers subscribe with name patterns such as `ledger:*`.

mod bus;
mod subscription;

pub use bus::{EventBus, EventReceiver, EventSender};
pub use subscription::{EventPattern, SubscriberId, Subscription};
