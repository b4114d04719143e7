//! Route definitions for scenario comparisons.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::comparison;
use crate::state::AppState;

/// Comparison routes, merged at the `/api/v1` root.
///
/// ```text
/// POST   /compare            -> compare
/// GET    /comparisons        -> list
/// GET    /comparisons/{id}   -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/compare", post(comparison::compare))
        .route("/comparisons", get(comparison::list))
        .route("/comparisons/{id}", get(comparison::get_by_id))
}
