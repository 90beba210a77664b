// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scan session: wires catalog, ledger, history and persister together

use crate::catalog::ReferenceCatalog;
use crate::dirty::DirtyFlag;
use crate::error::EngineError;
use crate::history::HistoryLog;
use crate::ledger::ScanLedger;
use crate::persister::{FlushReport, Persister, PersisterHandle};
use crate::projection::{self, HistoryRow, ProjectionRow};
use crate::reconcile::{Outcome, Reconciler, ReconcilerParts};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tally_adapters::StoreAdapter;
use tally_core::{
    read_catalog, Clock, Event, EventBus, EventReceiver, IdGen, ReferenceItem, Subscription,
};

/// Session adapter dependencies
pub struct SessionDeps<S> {
    pub store: S,
    pub events: EventBus,
}

/// One stocktake session over a durable store
pub struct ScanSession<S: StoreAdapter, C: Clock, I: IdGen> {
    store: S,
    catalog: Arc<ReferenceCatalog>,
    ledger: Arc<ScanLedger<C>>,
    history: Arc<HistoryLog>,
    dirty: DirtyFlag,
    events: EventBus,
    reconciler: Reconciler<C, I>,
    persister: Arc<Persister<S, C>>,
}

impl<S, C, I> ScanSession<S, C, I>
where
    S: StoreAdapter,
    C: Clock,
    I: IdGen,
{
    /// Create an empty session. Use [`Self::open`] to resume stored state.
    pub fn new(deps: SessionDeps<S>, clock: C, id_gen: I) -> Self {
        let SessionDeps { store, events } = deps;
        let catalog = Arc::new(ReferenceCatalog::new());
        let ledger = Arc::new(ScanLedger::new(clock, events.clone()));
        let history = Arc::new(HistoryLog::new());
        let dirty = DirtyFlag::new();

        let reconciler = Reconciler::new(
            ReconcilerParts {
                catalog: Arc::clone(&catalog),
                ledger: Arc::clone(&ledger),
                history: Arc::clone(&history),
                dirty: dirty.clone(),
                events: events.clone(),
            },
            id_gen,
        );
        let persister = Arc::new(Persister::new(
            store.clone(),
            Arc::clone(&ledger),
            Arc::clone(&history),
            dirty.clone(),
            events.clone(),
        ));

        Self {
            store,
            catalog,
            ledger,
            history,
            dirty,
            events,
            reconciler,
            persister,
        }
    }

    /// Create a session seeded from the durable store
    pub async fn open(deps: SessionDeps<S>, clock: C, id_gen: I) -> Result<Self, EngineError> {
        let session = Self::new(deps, clock, id_gen);
        session.restore().await?;
        Ok(session)
    }

    /// Reload catalog, ledger and history from the store.
    ///
    /// Restored state is already durable, so nothing is marked dirty and no
    /// change events are published.
    pub async fn restore(&self) -> Result<(), EngineError> {
        let items = self.store.load_catalog().await?;
        let records = self.store.load_ledger().await?;
        let entries = self.store.load_history().await?;

        let catalog = self.catalog.load(items);
        let ledger = records.len();
        let history = entries.len();
        self.ledger.restore(records);
        self.history.restore(entries);

        tracing::info!(catalog, ledger, history, "session restored");
        Ok(())
    }

    /// Replace the reference catalog, persisting it first
    pub async fn import_catalog(&self, items: Vec<ReferenceItem>) -> Result<usize, EngineError> {
        let items: Vec<ReferenceItem> = items
            .into_iter()
            .map(|item| (item.barcode.clone(), item))
            .collect::<BTreeMap<_, _>>()
            .into_values()
            .collect();

        self.store.replace_catalog(&items).await?;
        let count = self.catalog.load(items);

        tracing::info!(items = count, "catalog imported");
        self.events.publish(Event::CatalogLoaded { items: count });
        Ok(count)
    }

    /// Import a delimited text export
    pub async fn import_file(&self, path: &Path) -> Result<usize, EngineError> {
        let items = read_catalog(path)?;
        self.import_catalog(items).await
    }

    pub fn record_scan(&self, raw: &str) -> Outcome {
        self.reconciler.record_scan(raw)
    }

    pub fn set_quantity(&self, raw: &str, quantity: u32) -> Outcome {
        self.reconciler.set_quantity(raw, quantity)
    }

    pub fn projection(&self) -> Vec<ProjectionRow> {
        projection::project(&self.ledger.snapshot(), &self.catalog)
    }

    pub fn history(&self) -> Vec<HistoryRow> {
        projection::history_view(&self.history.entries())
    }

    pub async fn flush(&self) -> Result<Option<FlushReport>, EngineError> {
        Ok(self.persister.flush().await?)
    }

    /// Start the background write-behind loop
    pub fn start_persister(&self, interval: Duration) -> PersisterHandle {
        Arc::clone(&self.persister).spawn(interval)
    }

    pub fn subscribe(&self, subscription: Subscription) -> EventReceiver {
        self.events.subscribe(subscription)
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &ScanLedger<C> {
        &self.ledger
    }

    pub fn history_log(&self) -> &HistoryLog {
        &self.history
    }

    /// Whether changes are waiting for the next flush
    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
