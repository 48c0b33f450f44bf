//! Device catalog models: device types (classifiers) and physical devices.
//!
//! The inventory subsystem owns these tables; the lifecycle engine reads
//! them for existence and classifier checks.

use fixtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `device_types` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceType {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new device type.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDeviceType {
    pub name: String,
}

/// A row from the `devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Device {
    pub id: DbId,
    pub device_type_id: DbId,
    pub asset_tag: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new physical device.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDevice {
    pub device_type_id: DbId,
    pub asset_tag: String,
    pub name: String,
}
