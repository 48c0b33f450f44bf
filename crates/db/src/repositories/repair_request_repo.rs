//! Repository for the `repair_requests` table.

use fixtrack_core::paging::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use fixtrack_core::status::RequestStatus;
use fixtrack_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::repair_request::{
    RepairRequest, RepairRequestPage, RepairRequestSummary, RequestSummaryReport, StatusCount,
};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, description, severity, location, device_type_id, status, \
    created_by, assigned_to, assigned_by, assigned_at, deleted_by, deleted_at, \
    created_at, updated_at";

/// Filters for the paginated request listing. All fields optional.
#[derive(Debug, Clone, Default)]
pub struct RepairRequestFilter {
    pub status: Option<RequestStatus>,
    pub assigned_to: Option<DbId>,
    pub created_from: Option<Timestamp>,
    pub created_to: Option<Timestamp>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Provides read and soft-delete-aware queries for repair requests.
/// Mutations that span tables live in `LifecycleRepo`.
pub struct RepairRequestRepo;

impl RepairRequestRepo {
    /// Find a repair request by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<RepairRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM repair_requests WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, RepairRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a repair request by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<RepairRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repair_requests WHERE id = $1");
        sqlx::query_as::<_, RepairRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Paginated listing of non-deleted requests with their active device
    /// counts, newest first. Every filter is optional.
    pub async fn list(
        pool: &PgPool,
        filter: &RepairRequestFilter,
    ) -> Result<RepairRequestPage, sqlx::Error> {
        let limit = clamp_limit(filter.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = clamp_offset(filter.offset);
        let status = filter.status.map(|s| s.as_str());

        let items = sqlx::query_as::<_, RepairRequestSummary>(
            "SELECT r.id, r.description, r.severity, r.location, r.status, r.device_type_id,
                    r.assigned_to,
                    (SELECT COUNT(*) FROM repair_devices d
                      WHERE d.repair_request_id = r.id AND d.deleted_at IS NULL) AS device_count,
                    r.created_at
             FROM repair_requests r
             WHERE r.deleted_at IS NULL
               AND ($1::text IS NULL OR r.status = $1)
               AND ($2::bigint IS NULL OR r.assigned_to = $2)
               AND ($3::timestamptz IS NULL OR r.created_at >= $3)
               AND ($4::timestamptz IS NULL OR r.created_at <= $4)
             ORDER BY r.created_at DESC, r.id DESC
             LIMIT $5 OFFSET $6",
        )
        .bind(status)
        .bind(filter.assigned_to)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM repair_requests r
             WHERE r.deleted_at IS NULL
               AND ($1::text IS NULL OR r.status = $1)
               AND ($2::bigint IS NULL OR r.assigned_to = $2)
               AND ($3::timestamptz IS NULL OR r.created_at >= $3)
               AND ($4::timestamptz IS NULL OR r.created_at <= $4)",
        )
        .bind(status)
        .bind(filter.assigned_to)
        .bind(filter.created_from)
        .bind(filter.created_to)
        .fetch_one(pool)
        .await?;

        Ok(RepairRequestPage {
            items,
            total_count: total.0,
        })
    }

    /// Status-bucket counts over non-deleted requests, zero-filled so every
    /// bucket appears, plus the overall total.
    pub async fn summary_report(pool: &PgPool) -> Result<RequestSummaryReport, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT status, COUNT(*) FROM repair_requests
             WHERE deleted_at IS NULL
             GROUP BY status",
        )
        .fetch_all(pool)
        .await?;

        let by_status = RequestStatus::BUCKETS
            .iter()
            .map(|bucket| {
                let count = rows
                    .iter()
                    .find(|(status, _)| status == bucket.as_str())
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                StatusCount {
                    status: bucket.as_str().to_string(),
                    count,
                }
            })
            .collect();

        let total: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM repair_requests WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;

        Ok(RequestSummaryReport {
            by_status,
            total_count: total.0,
        })
    }
}
