//! # POS Store
//!
//! Owns the live [`PosState`] and keeps the SQLite snapshot in step with it.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.mutate(|state| state.process_sale(tender))                       │
//! │                                                                         │
//! │  1. lock ─────────────── one writer at a time                          │
//! │  2. clone state ──────── work on a draft                               │
//! │  3. apply transition ─── Err? drop draft, unlock, return error         │
//! │  4. save draft ───────── Err? drop draft, unlock, return error         │
//! │  5. swap draft in ────── readers now see the new state                 │
//! │  6. unlock                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The lock is held across the save, so snapshots reach the database in
//! the same order the transitions happened, and memory never gets ahead of
//! what is on disk.

use std::sync::Arc;

use caixa_core::{PosState, DEFAULT_STORAGE_KEY};
use caixa_db::Database;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// Shared handle to the POS state. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PosStore {
    state: Arc<Mutex<PosState>>,
    db: Database,
    key: Arc<str>,
}

impl PosStore {
    /// Restores the snapshot under `key`, or starts empty when there is none.
    pub async fn load(db: Database, key: &str) -> ApiResult<Self> {
        let state: PosState = db.snapshots().load(key).await?.unwrap_or_default();

        info!(
            key = %key,
            products = state.products.len(),
            cart_lines = state.cart.item_count(),
            sales = state.sales.len(),
            "POS state restored"
        );

        Ok(PosStore {
            state: Arc::new(Mutex::new(state)),
            db,
            key: Arc::from(key),
        })
    }

    /// Empty store on the default key (for testing).
    pub fn new(db: Database) -> Self {
        PosStore {
            state: Arc::new(Mutex::new(PosState::default())),
            db,
            key: Arc::from(DEFAULT_STORAGE_KEY),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Runs a read-only closure against the current state.
    pub async fn read<T>(&self, f: impl FnOnce(&PosState) -> T) -> T {
        let guard = self.state.lock().await;
        f(&guard)
    }

    /// Applies one transition and persists the result.
    ///
    /// Either both the in-memory state and the snapshot advance, or neither
    /// does.
    pub async fn mutate<T, E>(&self, f: impl FnOnce(&mut PosState) -> Result<T, E>) -> ApiResult<T>
    where
        E: Into<ApiError>,
    {
        let mut guard = self.state.lock().await;

        let mut draft = guard.clone();
        let output = f(&mut draft).map_err(Into::into)?;

        self.db.snapshots().save(&self.key, &draft).await?;
        *guard = draft;

        debug!(key = %self.key, "Snapshot persisted");
        Ok(output)
    }

    /// A copy of the whole state.
    pub async fn snapshot(&self) -> PosState {
        self.state.lock().await.clone()
    }
}
