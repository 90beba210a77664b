// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn ledger_sub(id: &str) -> Subscription {
    Subscription::to(id, &["ledger:*"])
}

#[tokio::test]
async fn publish_to_matching_subscribers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(ledger_sub("main-page"));

    bus.publish(Event::RecordInserted {
        barcode: "15060715".to_string(),
    });

    let event = rx.try_recv().unwrap();
    assert!(matches!(event, Event::RecordInserted { barcode } if barcode == "15060715"));
}

#[tokio::test]
async fn non_matching_events_not_delivered() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe(ledger_sub("main-page"));

    bus.publish(Event::FlushCompleted {
        records: 1,
        entries: 1,
    });

    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn events_arrive_in_publish_order() {
    let bus = EventBus::new();
    let sub = Subscription::to("all", &["**"]);
    let mut rx = bus.subscribe(sub);

    bus.publish(Event::RecordInserted {
        barcode: "A".to_string(),
    });
    bus.publish(Event::LogAppended {
        barcode: "A".to_string(),
        quantity: 1,
    });

    assert_eq!(rx.try_recv().unwrap().name(), "ledger:inserted");
    assert_eq!(rx.try_recv().unwrap().name(), "log:appended");
}

#[test]
fn unsubscribe_removes_subscriber() {
    let bus = EventBus::new();
    let _rx = bus.subscribe(ledger_sub("test-sub"));
    assert_eq!(bus.subscriber_count(), 1);

    bus.unsubscribe(&SubscriberId("test-sub".to_string()));
    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn dropped_receiver_is_pruned_on_publish() {
    let bus = EventBus::new();
    let rx = bus.subscribe(ledger_sub("short-lived"));
    drop(rx);

    bus.publish(Event::RecordUpdated {
        barcode: "A".to_string(),
    });

    assert_eq!(bus.subscriber_count(), 0);
}

#[test]
fn clone_shares_state() {
    let bus1 = EventBus::new();
    let bus2 = bus1.clone();
    let _rx = bus1.subscribe(ledger_sub("test-sub"));

    assert_eq!(bus1.subscriber_count(), 1);
    assert_eq!(bus2.subscriber_count(), 1);
}
