// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch of host input to the scan session.

use std::path::Path;

use serde::Serialize;
use tally_adapters::StoreAdapter;
use tally_core::{Clock, Comparison, Event, IdGen};
use tally_engine::{HistoryRow, Outcome, ProjectionRow, Rejection, ScanSession};
use tracing::{debug, warn};

use crate::input::{parse_line, Input};

/// One JSON line written to stdout
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    /// Host is reading input
    Ready,
    Accepted {
        barcode: String,
        quantity: u32,
        initial_quantity: u32,
        status: Comparison,
    },
    Unchanged {
        barcode: String,
        quantity: u32,
    },
    Unknown {
        barcode: String,
    },
    Imported {
        items: usize,
    },
    Rows {
        rows: Vec<ProjectionRow>,
    },
    History {
        entries: Vec<HistoryRow>,
    },
    FlushFailed {
        error: String,
    },
    Error {
        message: String,
    },
}

/// Handle one input line. Silent inputs (blank scans) produce no reply.
pub async fn handle_line<S, C, I>(
    session: &ScanSession<S, C, I>,
    root: &Path,
    line: &str,
) -> Option<Reply>
where
    S: StoreAdapter,
    C: Clock,
    I: IdGen,
{
    let input = match parse_line(line) {
        Ok(input) => input,
        Err(e) => {
            return Some(Reply::Error {
                message: e.to_string(),
            })
        }
    };

    debug!(?input, "host input");

    match input {
        Input::Scan(raw) => outcome_reply(session.record_scan(&raw)),

        Input::Set { barcode, quantity } => outcome_reply(session.set_quantity(&barcode, quantity)),

        Input::Import(path) => {
            let path = if path.is_relative() {
                root.join(path)
            } else {
                path
            };
            match session.import_file(&path).await {
                Ok(items) => Some(Reply::Imported { items }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "catalog import failed");
                    Some(Reply::Error {
                        message: e.to_string(),
                    })
                }
            }
        }

        Input::List => Some(Reply::Rows {
            rows: session.projection(),
        }),

        Input::Log => Some(Reply::History {
            entries: session.history(),
        }),
    }
}

/// Reply for a bus event worth surfacing to the operator
pub fn event_reply(event: Event) -> Option<Reply> {
    match event {
        Event::FlushFailed { error } => Some(Reply::FlushFailed { error }),
        _ => None,
    }
}

fn outcome_reply(outcome: Outcome) -> Option<Reply> {
    match outcome {
        Outcome::Accepted { record, .. } => Some(Reply::Accepted {
            status: record.status(),
            barcode: record.barcode,
            quantity: record.quantity,
            initial_quantity: record.initial_quantity,
        }),
        Outcome::Unchanged { record } => Some(Reply::Unchanged {
            barcode: record.barcode,
            quantity: record.quantity,
        }),
        Outcome::Rejected(Rejection::UnknownBarcode(barcode)) => Some(Reply::Unknown { barcode }),
        Outcome::Rejected(Rejection::EmptyInput) => None,
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
