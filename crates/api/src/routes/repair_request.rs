//! Route definitions for repair request endpoints.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::repair_request;
use crate::state::AppState;

/// Routes mounted at `/repair-requests`.
///
/// ```text
/// GET    /                                    -> list
/// POST   /                                    -> create
/// GET    /summary                             -> summary_report
/// GET    /{id}                                -> get_by_id
/// PUT    /{id}                                -> update
/// DELETE /{id}                                -> delete
/// PUT    /{id}/devices/{device_id}/status     -> change_device_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(repair_request::list).post(repair_request::create),
        )
        .route("/summary", get(repair_request::summary_report))
        .route(
            "/{id}",
            get(repair_request::get_by_id)
                .put(repair_request::update)
                .delete(repair_request::delete),
        )
        .route(
            "/{id}/devices/{device_id}/status",
            put(repair_request::change_device_status),
        )
}
