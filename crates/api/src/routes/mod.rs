pub mod comparison;
pub mod health;
pub mod scenario;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /scenarios                                                list, create
/// /scenarios/{id}                                           get, update, delete
/// /scenarios/{id}/metrics                                   stored metrics
/// /scenarios/{id}/calculate-metrics                         recalculate (POST)
/// /scenarios/{id}/promote                                   promote (POST)
/// /scenarios/{id}/allocations                               list
/// /scenarios/{id}/allocations/{allocation_id}               update, delete
/// /scenarios/{id}/projects/{project_id}/timeline            upsert, delete
/// /scenarios/{id}/resources                                 allocation or change upsert (POST)
/// /scenarios/{id}/resource-changes                          list
/// /scenarios/{id}/resource-changes/{change_id}              delete
///
/// /compare                                                  compare (POST)
/// /comparisons                                              list saved
/// /comparisons/{id}                                         get saved
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/scenarios", scenario::router())
        .merge(comparison::router())
}
