//! Shared query parameter types for API handlers.

use fixtrack_core::status::RequestStatus;
use fixtrack_core::types::{DbId, Timestamp};
use serde::Deserialize;

/// Query parameters for the repair request listing
/// (`?status=&assigned_to=&created_from=&created_to=&limit=&offset=`).
///
/// Pagination values are clamped in the repository layer via
/// `clamp_limit` / `clamp_offset`.
#[derive(Debug, Deserialize)]
pub struct RepairRequestListParams {
    pub status: Option<RequestStatus>,
    pub assigned_to: Option<DbId>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
