//! Handlers for proposed project date changes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::error::CoreError;
use resourcepulse_core::scenario;
use resourcepulse_core::types::DbId;
use resourcepulse_db::models::timeline_change::CreateTimelineChange;
use resourcepulse_db::repositories::{ProjectRepo, TimelineChangeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::scenario::ensure_whatif_scenario;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/scenarios/{id}/projects/{project_id}/timeline
///
/// Records new dates for a project. The project's live dates are captured
/// as the originals on the first write only.
pub async fn upsert(
    State(state): State<AppState>,
    Path((scenario_id, project_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateTimelineChange>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    let (new_start_date, new_end_date) =
        scenario::require_date_range("Timeline", input.new_start_date, input.new_end_date)?;

    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;

    let change = TimelineChangeRepo::upsert(
        &state.pool,
        scenario_id,
        &project,
        new_start_date,
        new_end_date,
        input.notes.as_deref(),
    )
    .await?;

    tracing::info!(
        scenario_id,
        project_id,
        %new_start_date,
        %new_end_date,
        "Timeline change recorded"
    );
    Ok(Json(DataResponse { data: change }))
}

/// DELETE /api/v1/scenarios/{id}/projects/{project_id}/timeline
pub async fn delete(
    State(state): State<AppState>,
    Path((scenario_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    if TimelineChangeRepo::delete(&state.pool, scenario_id, project_id).await? {
        tracing::info!(scenario_id, project_id, "Timeline change removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Timeline change for project",
            id: project_id,
        }))
    }
}
