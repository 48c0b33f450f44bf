//! Repository for the `devices` table (physical-device catalog).

use fixtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::{CreateDevice, Device};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, device_type_id, asset_tag, name, created_at, updated_at";

/// Provides lookups against the physical-device catalog.
pub struct DeviceRepo;

impl DeviceRepo {
    /// Insert a new device, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateDevice) -> Result<Device, sqlx::Error> {
        let query = format!(
            "INSERT INTO devices (device_type_id, asset_tag, name)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(input.device_type_id)
            .bind(&input.asset_tag)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a device by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Device>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM devices WHERE id = $1");
        sqlx::query_as::<_, Device>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all devices of a given type, ordered by asset tag.
    pub async fn list_by_type(
        pool: &PgPool,
        device_type_id: DbId,
    ) -> Result<Vec<Device>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM devices WHERE device_type_id = $1 ORDER BY asset_tag ASC"
        );
        sqlx::query_as::<_, Device>(&query)
            .bind(device_type_id)
            .fetch_all(pool)
            .await
    }
}
