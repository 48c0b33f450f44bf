//! Repository for the `repair_device_history` ledger.
//!
//! The ledger is append-only: rows are inserted by the lifecycle service
//! and never updated or deleted, so this repository exposes reads only.

use fixtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::history::HistoryEntry;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, repair_device_id, status, note, vendor_id, actor_id, created_at";

/// Provides read access to the device status history.
pub struct HistoryRepo;

impl HistoryRepo {
    /// List all history entries for a repair device, oldest first.
    pub async fn list_for_device(
        pool: &PgPool,
        repair_device_id: DbId,
    ) -> Result<Vec<HistoryEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repair_device_history
             WHERE repair_device_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, HistoryEntry>(&query)
            .bind(repair_device_id)
            .fetch_all(pool)
            .await
    }

    /// Count the history entries for a repair device.
    pub async fn count_for_device(
        pool: &PgPool,
        repair_device_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM repair_device_history WHERE repair_device_id = $1",
        )
        .bind(repair_device_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
