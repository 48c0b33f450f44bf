//! Repair device entity model and DTOs.

use fixtrack_core::status::DeviceStatus;
use fixtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::history::HistoryEntry;

/// A row from the `repair_devices` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairDevice {
    pub id: DbId,
    pub repair_request_id: DbId,
    pub device_id: DbId,
    pub status: String,
    pub created_by: DbId,
    pub deleted_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Detail projection for request views: the device row joined with the
/// catalog entry and the latest history slice (vendor / note).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairDeviceDetail {
    pub id: DbId,
    pub device_id: DbId,
    pub asset_tag: String,
    pub device_name: String,
    pub status: String,
    pub latest_vendor_id: Option<DbId>,
    pub latest_note: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for changing one device's repair status.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeDeviceStatus {
    pub status: DeviceStatus,
    /// Acting user (the excluded auth layer supplies this).
    pub actor_id: DbId,
    /// Only meaningful for vendor assignment.
    pub vendor_id: Option<DbId>,
    pub note: Option<String>,
}

/// A repair device together with its full history, returned by the
/// status-change operation.
#[derive(Debug, Clone, Serialize)]
pub struct RepairDeviceWithHistory {
    pub device: RepairDevice,
    pub history: Vec<HistoryEntry>,
}
