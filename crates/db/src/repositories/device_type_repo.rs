//! Repository for the `device_types` table.

use fixtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::device::{CreateDeviceType, DeviceType};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides lookups against the device-type classifier catalog.
pub struct DeviceTypeRepo;

impl DeviceTypeRepo {
    /// Insert a new device type, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDeviceType,
    ) -> Result<DeviceType, sqlx::Error> {
        let query = format!("INSERT INTO device_types (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, DeviceType>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a device type by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeviceType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM device_types WHERE id = $1");
        sqlx::query_as::<_, DeviceType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
