//! # Snapshot Repository
//!
//! Stores whole JSON documents under string keys in `kv_store`.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  kv_store                                                               │
//! │  ┌────────────────────┬─────────────────────────────┬───────────────┐  │
//! │  │ key                │ value (JSON)                │ updated_at    │  │
//! │  ├────────────────────┼─────────────────────────────┼───────────────┤  │
//! │  │ caixa-pos-storage  │ {"products":[..],"cart":..} │ 2026-10-19... │  │
//! │  └────────────────────┴─────────────────────────────┴───────────────┘  │
//! │                                                                         │
//! │  save() = INSERT ... ON CONFLICT(key) DO UPDATE  (last write wins)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository for keyed JSON snapshots.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.snapshots();
/// repo.save("caixa-pos-storage", &state).await?;
/// let restored: Option<PosState> = repo.load("caixa-pos-storage").await?;
/// ```
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Loads and decodes the document under `key`. `None` if the key was
    /// never written.
    pub async fn load<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            debug!(key = %key, "No snapshot stored");
            return Ok(None);
        };

        let raw: String = row.try_get("value")?;
        debug!(key = %key, bytes = raw.len(), "Snapshot loaded");

        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Encodes `value` and replaces whatever is stored under `key`.
    pub async fn save<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        let raw = serde_json::to_string(value)?;

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        debug!(key = %key, bytes = raw.len(), "Snapshot saved");
        Ok(())
    }

    /// Removes the document under `key`. Returns whether a row existed.
    pub async fn delete(&self, key: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM kv_store WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All stored keys, sorted.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys = sqlx::query_scalar("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use caixa_core::{NewProduct, PaymentMethod, PosState, DEFAULT_STORAGE_KEY};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn sample_state() -> PosState {
        let mut state = PosState::new();
        let product = state.add_product(NewProduct {
            name: "Coca-Cola 350ml".to_string(),
            sku: "BEB-001".to_string(),
            cost_price_cents: 550,
            sale_price_cents: 899,
            stock: 48,
            category: "Bebidas".to_string(),
        });
        state.add_to_cart(&product, 2);
        state.process_sale(PaymentMethod::Pix.into()).unwrap();
        state.add_to_cart(&product, 1);
        state
    }

    #[tokio::test]
    async fn test_load_missing_key_returns_none() {
        let db = test_db().await;
        let loaded: Option<PosState> = db.snapshots().load(DEFAULT_STORAGE_KEY).await.unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_restores_state() {
        let db = test_db().await;
        let state = sample_state();

        db.snapshots().save(DEFAULT_STORAGE_KEY, &state).await.unwrap();
        let loaded: PosState = db
            .snapshots()
            .load(DEFAULT_STORAGE_KEY)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.sales.len(), 1);
        assert_eq!(loaded.products[0].stock, 46);
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_snapshot() {
        let db = test_db().await;
        let repo = db.snapshots();

        repo.save(DEFAULT_STORAGE_KEY, &PosState::new()).await.unwrap();
        repo.save(DEFAULT_STORAGE_KEY, &sample_state()).await.unwrap();

        let loaded: PosState = repo.load(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
        assert_eq!(loaded.products.len(), 1);
        assert_eq!(repo.keys().await.unwrap(), vec![DEFAULT_STORAGE_KEY.to_string()]);
    }

    #[tokio::test]
    async fn test_delete() {
        let db = test_db().await;
        let repo = db.snapshots();

        repo.save("other", &PosState::new()).await.unwrap();
        assert!(repo.delete("other").await.unwrap());
        assert!(!repo.delete("other").await.unwrap());
        assert!(repo.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_is_serialization_error() {
        let db = test_db().await;
        sqlx::query("INSERT INTO kv_store (key, value, updated_at) VALUES ('bad', '{oops', '')")
            .execute(db.pool())
            .await
            .unwrap();

        let result = db.snapshots().load::<PosState>("bad").await;
        assert!(matches!(result, Err(DbError::Serialization(_))));
    }
}
