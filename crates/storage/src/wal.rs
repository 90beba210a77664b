// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log for durable storage

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tally_core::Operation;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt WAL entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Append-only JSON-lines log of store operations
pub struct Wal {
    file: File,
    sequence: u64,
    /// Length of the file up to the last fully synced entry
    len: u64,
}

impl Wal {
    /// Open or create a WAL at the given path.
    ///
    /// A torn final line is truncated so new appends start on a clean line.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        truncate_torn_tail(path)?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let reader = BufReader::new(File::open(path)?);
        let sequence = reader
            .lines()
            .map_while(Result::ok)
            .filter(|l| !l.is_empty())
            .count() as u64;
        let len = file.metadata()?.len();

        Ok(Self {
            file,
            sequence,
            len,
        })
    }

    /// Append a batch of operations with a single sync.
    ///
    /// A failed write is rolled back to the last complete entry, so a retry
    /// never lands behind a partial line.
    pub fn append_all(&mut self, ops: &[Operation]) -> Result<u64, WalError> {
        if ops.is_empty() {
            return Ok(self.sequence);
        }

        let mut buf = String::new();
        let mut seq = self.sequence;
        for op in ops {
            seq += 1;
            let entry = WalEntryRef { seq, op };
            buf.push_str(&serde_json::to_string(&entry)?);
            buf.push('\n');
        }

        self.reclaim_tail()?;
        if let Err(e) = self.write_synced(buf.as_bytes()) {
            if let Err(rollback) = self.file.set_len(self.len) {
                tracing::error!(error = %rollback, "failed to roll back partial WAL write");
            }
            return Err(e.into());
        }
        self.len += buf.len() as u64;
        self.sequence = seq;
        Ok(self.sequence)
    }

    fn write_synced(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.file.write_all(bytes)?;
        self.file.sync_all()
    }

    /// Drop bytes past the last complete entry left by an earlier failed write
    fn reclaim_tail(&mut self) -> io::Result<()> {
        let actual = self.file.metadata()?.len();
        if actual != self.len {
            tracing::warn!(
                dropped_bytes = actual.saturating_sub(self.len),
                "discarding partial WAL write"
            );
            self.file.set_len(self.len)?;
        }
        Ok(())
    }

    /// Append a single operation
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        self.append_all(std::slice::from_ref(op))
    }

    /// Number of entries written so far
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay all operations from the log.
    ///
    /// A torn final line (crash mid-write) is dropped; corruption anywhere
    /// else is an error.
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<String> = BufReader::new(file)
            .lines()
            .collect::<Result<_, _>>()?;
        let last = lines.iter().rposition(|l| !l.is_empty());

        let mut ops = Vec::with_capacity(lines.len());
        for (index, line) in lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<WalEntry>(line) {
                Ok(entry) => ops.push(entry.op),
                Err(e) if Some(index) == last => {
                    tracing::warn!(line = index + 1, error = %e, "dropping torn WAL tail");
                }
                Err(source) => {
                    return Err(WalError::Corrupt {
                        line: index + 1,
                        source,
                    })
                }
            }
        }

        Ok(ops)
    }
}

fn truncate_torn_tail(path: &Path) -> io::Result<()> {
    let content = match std::fs::read(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e),
    };
    if content.is_empty() || content.ends_with(b"\n") {
        return Ok(());
    }

    let keep = content
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i + 1);
    tracing::warn!(
        path = %path.display(),
        dropped_bytes = content.len() - keep,
        "truncating torn WAL tail"
    );
    OpenOptions::new()
        .write(true)
        .open(path)?
        .set_len(keep as u64)
}

/// Replay only needs the operation; `seq` is informational
#[derive(Debug, serde::Deserialize)]
struct WalEntry {
    op: Operation,
}

#[derive(serde::Serialize)]
struct WalEntryRef<'a> {
    seq: u64,
    op: &'a Operation,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
