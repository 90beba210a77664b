// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event bus for routing change notifications to observers

use super::subscription::{SubscriberId, Subscription};
use crate::event::Event;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

/// Sender for event delivery
pub type EventSender = mpsc::UnboundedSender<Event>;
/// Receiver for event delivery
pub type EventReceiver = mpsc::UnboundedReceiver<Event>;

struct Subscriber {
    subscription: Subscription,
    tx: EventSender,
}

type Subscribers = HashMap<SubscriberId, Subscriber>;

/// Routes events to matching subscribers.
///
/// Publishing never blocks: channels are unbounded and a subscriber whose
/// receiver was dropped is pruned on the next publish.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<RwLock<Subscribers>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events matching the subscription's patterns.
    ///
    /// Re-using an id replaces the earlier subscriber.
    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        let (tx, rx) = mpsc::unbounded_channel();
        self.write()
            .insert(subscription.id.clone(), Subscriber { subscription, tx });
        rx
    }

    pub fn unsubscribe(&self, id: &SubscriberId) {
        self.write().remove(id);
    }

    /// Deliver `event` to every subscriber whose patterns match its name
    pub fn publish(&self, event: Event) {
        let name = event.name();
        let closed: Vec<SubscriberId> = self
            .read()
            .iter()
            .filter(|(_, sub)| sub.subscription.matches(&name))
            .filter(|(_, sub)| sub.tx.send(event.clone()).is_err())
            .map(|(id, _)| id.clone())
            .collect();

        if closed.is_empty() {
            return;
        }
        let mut subscribers = self.write();
        for id in closed {
            tracing::debug!(subscriber = %id.0, "dropping closed subscriber");
            subscribers.remove(&id);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.read().len()
    }

    fn read(&self) -> RwLockReadGuard<'_, Subscribers> {
        self.subscribers.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Subscribers> {
        self.subscribers.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
