//! Append-only device status history model.

use fixtrack_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `repair_device_history` table. Immutable once written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HistoryEntry {
    pub id: DbId,
    pub repair_device_id: DbId,
    pub status: String,
    pub note: Option<String>,
    pub vendor_id: Option<DbId>,
    pub actor_id: DbId,
    pub created_at: Timestamp,
}
