// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Host lifecycle management: configuration, startup, shutdown.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fs2::FileExt;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tally_adapters::{StoreError, TracedStoreAdapter, WalStoreAdapter};
use tally_core::{EventBus, EventReceiver, Subscription, SystemClock, UuidIdGen};
use tally_engine::{
    EngineError, PersisterHandle, ScanSession, SessionDeps, DEFAULT_FLUSH_INTERVAL,
};
use thiserror::Error;
use tracing::{info, warn};

/// Session with concrete adapter types (wrapped with tracing)
pub type HostSession = ScanSession<TracedStoreAdapter<WalStoreAdapter>, SystemClock, UuidIdGen>;

/// Name of the optional per-root settings file
pub const CONFIG_FILE: &str = "tally.toml";

/// Host configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Stocktake root directory
    pub root: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to host log file
    pub log_path: PathBuf,
    /// Path to the write-ahead log
    pub wal_path: PathBuf,
    /// Interval between write-behind flushes
    pub flush_interval: Duration,
    /// Catalog imported at startup, if any
    pub catalog: Option<PathBuf>,
}

/// Contents of `tally.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(with = "humantime_serde", default)]
    flush_interval: Option<Duration>,
    catalog: Option<PathBuf>,
}

impl Config {
    /// Create config for a stocktake root
    pub fn for_root(root: &Path) -> Result<Self, LifecycleError> {
        let canonical = root
            .canonicalize()
            .map_err(|e| LifecycleError::RootNotFound(root.to_path_buf(), e))?;
        let state_dir = state_dir()?.join("roots").join(root_hash(&canonical));
        Self::with_state_dir(canonical, &state_dir)
    }

    /// Create config with an explicit state directory
    pub fn with_state_dir(root: PathBuf, state_dir: &Path) -> Result<Self, LifecycleError> {
        let file = load_file_config(&root.join(CONFIG_FILE))?;

        Ok(Self {
            lock_path: state_dir.join("tallyd.pid"),
            log_path: state_dir.join("tallyd.log"),
            wal_path: state_dir.join("wal").join("ledger.wal"),
            flush_interval: file.flush_interval.unwrap_or(DEFAULT_FLUSH_INTERVAL),
            catalog: file.catalog.map(|path| root.join(path)),
            root,
        })
    }
}

fn load_file_config(path: &Path) -> Result<FileConfig, LifecycleError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(e.into()),
    };
    toml::from_str(&content).map_err(|e| LifecycleError::Config(path.to_path_buf(), e))
}

/// Host state during operation
pub struct HostState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub session: HostSession,
    /// Bus events surfaced to the operator
    pub events: EventReceiver,
    persister: Option<PersisterHandle>,
}

impl HostState {
    /// Stop the persister (final flush) and release the lock
    pub async fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down...");

        if let Some(persister) = self.persister.take() {
            persister.shutdown().await;
        }
        if self.session.is_dirty() {
            warn!(
                pending = self.session.history_log().pending_count(),
                "unflushed scans remain after final flush"
            );
        }

        if self.config.lock_path.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.lock_path) {
                warn!("Failed to remove PID file: {}", e);
            }
        }

        info!("Shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Root not found at {0}: {1}")]
    RootNotFound(PathBuf, std::io::Error),

    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: tallyd already running for this root?")]
    LockFailed(#[source] std::io::Error),

    #[error("Invalid config at {0}: {1}")]
    Config(PathBuf, toml::de::Error),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the host
pub async fn startup(config: &Config) -> Result<HostState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        // The PID file belongs to the running host
        Err(e @ LifecycleError::LockFailed(_)) => Err(e),
        Err(e) => {
            cleanup_on_failure(config);
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<HostState, LifecycleError> {
    // 1. Acquire lock file FIRST - prevents two hosts on one WAL
    if let Some(parent) = config.lock_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut lock_file = File::create(&config.lock_path)?;
    lock_file
        .try_lock_exclusive()
        .map_err(LifecycleError::LockFailed)?;
    use std::io::Write;
    writeln!(lock_file, "{}", std::process::id())?;

    // 2. Open and compact the WAL
    let store = WalStoreAdapter::open(&config.wal_path)?;
    store.compact().await?;

    // 3. Restore the session
    let events = EventBus::new();
    let operator_events = events.subscribe(Subscription::to("host", &["flush:failed"]));
    let session = ScanSession::open(
        SessionDeps {
            store: TracedStoreAdapter::new(store),
            events,
        },
        SystemClock,
        UuidIdGen,
    )
    .await?;

    info!(
        catalog = session.catalog().len(),
        ledger = session.ledger().len(),
        history = session.history_log().len(),
        "Loaded state"
    );

    // 4. Startup catalog from tally.toml replaces the stored one
    if let Some(path) = &config.catalog {
        session.import_file(path).await?;
    }

    // 5. Start write-behind persistence
    let persister = session.start_persister(config.flush_interval);

    info!(root = %config.root.display(), "tallyd started");

    Ok(HostState {
        config: config.clone(),
        lock_file,
        session,
        events: operator_events,
        persister: Some(persister),
    })
}

fn cleanup_on_failure(config: &Config) {
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Get the state directory for tally
fn state_dir() -> Result<PathBuf, LifecycleError> {
    // Use XDG_STATE_HOME or default to ~/.local/state
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("tally"));
    }

    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/tally"))
}

/// Hash of the canonical root, used as its state directory name
fn root_hash(path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let result = hasher.finalize();
    // First 16 chars of hex digest
    result[..8].iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
