pub mod health;
pub mod repair_request;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /repair-requests                                   list, create
/// /repair-requests/summary                           status-bucket report
/// /repair-requests/{id}                              get, update, delete
/// /repair-requests/{id}/devices/{device_id}/status   change device status (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/repair-requests", repair_request::router())
}
