//! Repository for the `repair_devices` table.

use fixtrack_core::types::DbId;
use sqlx::PgPool;

use crate::models::repair_device::{RepairDevice, RepairDeviceDetail};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, repair_request_id, device_id, status, created_by, \
    deleted_by, deleted_at, created_at, updated_at";

/// Provides queries over a request's device membership.
pub struct RepairDeviceRepo;

impl RepairDeviceRepo {
    /// Find the active (non-deleted) repair device for a physical device
    /// within one request.
    pub async fn find_active(
        pool: &PgPool,
        repair_request_id: DbId,
        device_id: DbId,
    ) -> Result<Option<RepairDevice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repair_devices
             WHERE repair_request_id = $1 AND device_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, RepairDevice>(&query)
            .bind(repair_request_id)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }

    /// List every device row for a request, including soft-deleted ones.
    /// Reconciliation needs the soft-deleted rows for reactivation lookup.
    pub async fn list_for_request_include_deleted(
        pool: &PgPool,
        repair_request_id: DbId,
    ) -> Result<Vec<RepairDevice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repair_devices
             WHERE repair_request_id = $1
             ORDER BY id ASC"
        );
        sqlx::query_as::<_, RepairDevice>(&query)
            .bind(repair_request_id)
            .fetch_all(pool)
            .await
    }

    /// Detail projection of a request's active devices: catalog fields plus
    /// the latest history slice (vendor / note) per device.
    pub async fn list_active_details(
        pool: &PgPool,
        repair_request_id: DbId,
    ) -> Result<Vec<RepairDeviceDetail>, sqlx::Error> {
        sqlx::query_as::<_, RepairDeviceDetail>(
            "SELECT rd.id, rd.device_id, d.asset_tag, d.name AS device_name, rd.status,
                    h.vendor_id AS latest_vendor_id, h.note AS latest_note, rd.created_at
             FROM repair_devices rd
             JOIN devices d ON d.id = rd.device_id
             LEFT JOIN LATERAL (
                 SELECT vendor_id, note FROM repair_device_history
                 WHERE repair_device_id = rd.id
                 ORDER BY created_at DESC, id DESC
                 LIMIT 1
             ) h ON true
             WHERE rd.repair_request_id = $1 AND rd.deleted_at IS NULL
             ORDER BY rd.id ASC",
        )
        .bind(repair_request_id)
        .fetch_all(pool)
        .await
    }
}
