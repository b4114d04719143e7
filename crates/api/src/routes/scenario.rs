//! Route definitions for the `/scenarios` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{allocation, metrics, promotion, resource_change, scenario, timeline};
use crate::state::AppState;

/// Routes mounted at `/scenarios`.
///
/// ```text
/// GET    /                                              -> list
/// POST   /                                              -> create
/// GET    /{id}                                          -> get_by_id
/// PUT    /{id}                                          -> update
/// DELETE /{id}                                          -> delete
/// GET    /{id}/metrics                                  -> get_stored
/// POST   /{id}/calculate-metrics                        -> calculate
/// POST   /{id}/promote                                  -> promote
/// GET    /{id}/allocations                              -> list
/// PUT    /{id}/allocations/{allocation_id}              -> update
/// DELETE /{id}/allocations/{allocation_id}              -> delete
/// POST   /{id}/projects/{project_id}/timeline           -> upsert
/// DELETE /{id}/projects/{project_id}/timeline           -> delete
/// POST   /{id}/resources                                -> upsert
/// GET    /{id}/resource-changes                         -> list
/// DELETE /{id}/resource-changes/{change_id}             -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scenario::list).post(scenario::create))
        .route(
            "/{id}",
            get(scenario::get_by_id)
                .put(scenario::update)
                .delete(scenario::delete),
        )
        .route("/{id}/metrics", get(metrics::get_stored))
        .route("/{id}/calculate-metrics", post(metrics::calculate))
        .route("/{id}/promote", post(promotion::promote))
        .route("/{id}/allocations", get(allocation::list))
        .route(
            "/{id}/allocations/{allocation_id}",
            put(allocation::update).delete(allocation::delete),
        )
        .route(
            "/{id}/projects/{project_id}/timeline",
            post(timeline::upsert).delete(timeline::delete),
        )
        .route("/{id}/resources", post(resource_change::upsert))
        .route("/{id}/resource-changes", get(resource_change::list))
        .route(
            "/{id}/resource-changes/{change_id}",
            axum::routing::delete(resource_change::delete),
        )
}
