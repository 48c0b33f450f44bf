//! Repair request (ticket) entity model and DTOs.

use fixtrack_core::severity::Severity;
use fixtrack_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::repair_device::RepairDeviceDetail;

/// A row from the `repair_requests` table.
///
/// `status` and `severity` are stored as text; the canonical values are
/// `fixtrack_core::status::RequestStatus` and `fixtrack_core::severity::Severity`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairRequest {
    pub id: DbId,
    pub description: String,
    pub severity: String,
    pub location: Option<String>,
    pub device_type_id: DbId,
    pub status: String,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
    pub assigned_by: Option<DbId>,
    pub assigned_at: Option<Timestamp>,
    pub deleted_by: Option<DbId>,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new repair request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRepairRequest {
    pub description: String,
    pub severity: Severity,
    pub location: Option<String>,
    pub device_type_id: DbId,
    /// Physical device IDs to open the request with. Must be non-empty,
    /// duplicate-free, and every device must match `device_type_id`.
    pub device_ids: Vec<DbId>,
    pub assigned_to: Option<DbId>,
    /// Acting user (the excluded auth layer supplies this).
    pub created_by: DbId,
}

/// DTO for updating an existing repair request. All fields are optional;
/// `updated_by` identifies the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRepairRequest {
    pub description: Option<String>,
    pub severity: Option<Severity>,
    pub location: Option<String>,
    /// The classifier is immutable; supplying the current value is a no-op,
    /// any other value is a validation error.
    pub device_type_id: Option<DbId>,
    pub assigned_to: Option<DbId>,
    /// Desired device membership. When present, membership is reconciled
    /// against this set (add / reactivate / remove).
    pub device_ids: Option<Vec<DbId>>,
    pub updated_by: DbId,
}

/// A repair request together with its active device membership.
#[derive(Debug, Clone, Serialize)]
pub struct RepairRequestDetail {
    pub request: RepairRequest,
    pub devices: Vec<RepairDeviceDetail>,
}

/// Listing projection: one request plus its active device count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RepairRequestSummary {
    pub id: DbId,
    pub description: String,
    pub severity: String,
    pub location: Option<String>,
    pub status: String,
    pub device_type_id: DbId,
    pub assigned_to: Option<DbId>,
    pub device_count: i64,
    pub created_at: Timestamp,
}

/// One page of request summaries.
#[derive(Debug, Clone, Serialize)]
pub struct RepairRequestPage {
    pub items: Vec<RepairRequestSummary>,
    pub total_count: i64,
}

/// Count of non-deleted requests in one status bucket.
#[derive(Debug, Clone, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Status-bucket counts plus the overall total, zero-filled so every
/// bucket appears even when empty.
#[derive(Debug, Clone, Serialize)]
pub struct RequestSummaryReport {
    pub by_status: Vec<StatusCount>,
    pub total_count: i64,
}
