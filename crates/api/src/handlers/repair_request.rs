//! Handlers for repair request lifecycle endpoints.
//!
//! Handlers stay thin: parameter extraction and response shaping here,
//! domain rules in `fixtrack_core`, persistence in `fixtrack_db`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use fixtrack_core::types::DbId;
use fixtrack_db::models::repair_device::{ChangeDeviceStatus, RepairDeviceWithHistory};
use fixtrack_db::models::repair_request::{
    CreateRepairRequest, RepairRequest, RepairRequestDetail, RepairRequestPage,
    RequestSummaryReport, UpdateRepairRequest,
};
use fixtrack_db::repositories::{LifecycleRepo, RepairRequestFilter, RepairRequestRepo};

use crate::error::AppResult;
use crate::query::RepairRequestListParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for the delete endpoint. The acting user comes in as a
/// query parameter because DELETE requests carry no body.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub actor_id: DbId,
}

/// GET /repair-requests
///
/// Paginated listing with optional status / assignee / date-range filters.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<RepairRequestListParams>,
) -> AppResult<Json<DataResponse<RepairRequestPage>>> {
    let filter = RepairRequestFilter {
        status: params.status,
        assigned_to: params.assigned_to,
        created_from: params.created_from,
        created_to: params.created_to,
        limit: params.limit,
        offset: params.offset,
    };
    let page = RepairRequestRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: page }))
}

/// POST /repair-requests
///
/// Open a new repair request with its initial device membership.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateRepairRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<RepairRequestDetail>>)> {
    let detail = LifecycleRepo::create_request(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /repair-requests/summary
///
/// Status-bucket counts over all non-deleted requests.
pub async fn summary_report(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RequestSummaryReport>>> {
    let report = RepairRequestRepo::summary_report(&state.pool).await?;
    Ok(Json(DataResponse { data: report }))
}

/// GET /repair-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RepairRequestDetail>>> {
    let detail = LifecycleRepo::get_request_detail(&state.pool, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /repair-requests/{id}
///
/// Update scalar fields, reconcile device membership, or assign the request.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRepairRequest>,
) -> AppResult<Json<DataResponse<RepairRequestDetail>>> {
    let detail = LifecycleRepo::update_request(&state.pool, id, &input).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /repair-requests/{id}?actor_id=
///
/// Soft-delete the request and cascade to its active devices.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteParams>,
) -> AppResult<Json<DataResponse<RepairRequest>>> {
    let deleted = LifecycleRepo::delete_request(&state.pool, id, params.actor_id).await?;
    Ok(Json(DataResponse { data: deleted }))
}

/// PUT /repair-requests/{id}/devices/{device_id}/status
///
/// Move one device through the repair state machine and re-derive the
/// request's aggregate status.
pub async fn change_device_status(
    State(state): State<AppState>,
    Path((id, device_id)): Path<(DbId, DbId)>,
    Json(input): Json<ChangeDeviceStatus>,
) -> AppResult<Json<DataResponse<RepairDeviceWithHistory>>> {
    let result = LifecycleRepo::change_device_status(&state.pool, id, device_id, &input).await?;
    Ok(Json(DataResponse { data: result }))
}
