//! Store construction and teardown for the process entry point.

use std::path::PathBuf;

use crate::DbError;
use crate::memory::MemoryStore;
use crate::snapshot::{Snapshot, load_principals};

/// Where the store persists its state between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// JSON snapshot loaded at startup and written at shutdown.
    pub snapshot_path: Option<PathBuf>,
    /// JSON array of principals used for reporter enrichment.
    pub principals_path: Option<PathBuf>,
}

impl StoreConfig {
    /// Reads `COASTWATCH_SNAPSHOT_PATH` and `COASTWATCH_PRINCIPALS_PATH`.
    /// Unset or empty variables disable the corresponding file.
    #[must_use]
    pub fn from_env() -> Self {
        let path_var = |name: &str| {
            std::env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from)
        };

        Self {
            snapshot_path: path_var("COASTWATCH_SNAPSHOT_PATH"),
            principals_path: path_var("COASTWATCH_PRINCIPALS_PATH"),
        }
    }
}

/// Builds the store, restoring the snapshot and principal directory when
/// configured.
///
/// # Errors
///
/// Returns [`DbError`] if a configured file exists but cannot be read or
/// parsed.
pub async fn open(config: &StoreConfig) -> Result<MemoryStore, DbError> {
    let snapshot = match &config.snapshot_path {
        Some(path) => Snapshot::load(path).await?,
        None => Snapshot::default(),
    };
    log::info!(
        "Restored {} reports and {} alerts",
        snapshot.reports.len(),
        snapshot.alerts.len()
    );

    let principals = match &config.principals_path {
        Some(path) => load_principals(path).await?,
        None => Vec::new(),
    };
    log::info!("Loaded {} principals into the directory", principals.len());

    Ok(MemoryStore::from_snapshot(snapshot).with_principals(principals))
}

/// Flushes the store to its snapshot file, if one is configured.
///
/// # Errors
///
/// Returns [`DbError`] if the snapshot cannot be written.
pub async fn close(store: &MemoryStore, config: &StoreConfig) -> Result<(), DbError> {
    let Some(path) = &config.snapshot_path else {
        log::info!("No snapshot path configured, discarding in-memory state");
        return Ok(());
    };

    let snapshot = store.snapshot().await;
    snapshot.save(path).await?;
    log::info!(
        "Saved {} reports and {} alerts to {}",
        snapshot.reports.len(),
        snapshot.alerts.len(),
        path.display()
    );
    Ok(())
}
