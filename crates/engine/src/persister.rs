// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-behind persister: copies the ledger and history tail to the store

use crate::dirty::DirtyFlag;
use crate::history::HistoryLog;
use crate::ledger::ScanLedger;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tally_adapters::{StoreAdapter, StoreError};
use tally_core::{elapsed_ms, Clock, Event, EventBus};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default interval between write-behind flushes
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// What one successful flush wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushReport {
    pub records: usize,
    pub entries: usize,
}

/// Periodically persists the in-memory state.
///
/// A flush swaps the dirty flag before reading anything, so a mutation that
/// lands mid-flush sets the flag again and is picked up next time. On failure
/// the flag is restored and the history cursor stays put; upserts and
/// appends are idempotent, so the retry rewrites whatever already landed.
pub struct Persister<S: StoreAdapter, C: Clock> {
    store: S,
    ledger: Arc<ScanLedger<C>>,
    history: Arc<HistoryLog>,
    dirty: DirtyFlag,
    events: EventBus,
    flushing: tokio::sync::Mutex<()>,
}

impl<S: StoreAdapter, C: Clock> Persister<S, C> {
    pub fn new(
        store: S,
        ledger: Arc<ScanLedger<C>>,
        history: Arc<HistoryLog>,
        dirty: DirtyFlag,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            ledger,
            history,
            dirty,
            events,
            flushing: tokio::sync::Mutex::new(()),
        }
    }

    /// Flush now if anything changed. `Ok(None)` means nothing was dirty.
    pub async fn flush(&self) -> Result<Option<FlushReport>, StoreError> {
        let _flushing = self.flushing.lock().await;
        if !self.dirty.take() {
            return Ok(None);
        }

        let start = Instant::now();
        match self.write().await {
            Ok(report) => {
                tracing::debug!(
                    records = report.records,
                    entries = report.entries,
                    elapsed_ms = elapsed_ms(start.elapsed()),
                    "flush completed"
                );
                self.events.publish(Event::FlushCompleted {
                    records: report.records,
                    entries: report.entries,
                });
                Ok(Some(report))
            }
            Err(e) => {
                self.dirty.mark();
                tracing::warn!(
                    error = %e,
                    pending = self.history.pending_count(),
                    "flush failed, will retry"
                );
                self.events.publish(Event::FlushFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    /// One interval tick. Failures are already logged and retried next tick.
    pub async fn tick(&self) {
        let _ = self.flush().await;
    }

    /// Run the flush loop on the tokio runtime until the handle is shut down
    pub fn spawn(self: Arc<Self>, interval: Duration) -> PersisterHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = interval.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // First tick completes immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => self.tick().await,
                    _ = &mut shutdown_rx => break,
                }
            }

            if let Err(e) = self.flush().await {
                tracing::error!(
                    error = %e,
                    pending = self.history.pending_count(),
                    "final flush failed"
                );
            }
        });

        PersisterHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }

    async fn write(&self) -> Result<FlushReport, StoreError> {
        // History first: every pending entry's mutation is then in the snapshot
        let (cursor, pending) = self.history.unflushed();
        let records = self.ledger.snapshot();

        let mut record_ids = HashMap::with_capacity(records.len());
        for record in &records {
            let id = self.store.upsert_ledger_record(record).await?;
            record_ids.insert(record.barcode.as_str(), id);
        }

        for entry in &pending {
            let mut entry = entry.clone();
            entry.scanned_record_id = record_ids.get(entry.barcode.as_str()).copied();
            self.store.append_log_entry(&entry).await?;
        }

        self.history.mark_flushed(cursor);
        Ok(FlushReport {
            records: records.len(),
            entries: pending.len(),
        })
    }
}

/// Handle to the background flush task
pub struct PersisterHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl PersisterHandle {
    /// Stop the loop and wait for the final flush
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "persister task ended abnormally");
        }
    }
}

#[cfg(test)]
#[path = "persister_tests.rs"]
mod tests;
