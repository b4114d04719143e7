//! Handler for promoting a scenario into the live tables.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::types::DbId;
use resourcepulse_db::repositories::PromotionRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/scenarios/{id}/promote
///
/// 404 for unknown or non-what-if scenarios, 409 when the scenario was
/// already promoted. Nothing is written unless every step succeeds.
pub async fn promote(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let summary = PromotionRepo::promote(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: summary }))
}
