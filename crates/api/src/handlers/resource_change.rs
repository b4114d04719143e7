//! Handlers for `POST /scenarios/{id}/resources` and recorded resource
//! changes.
//!
//! The POST endpoint is dual-purpose: with both `resource_id` and
//! `allocation_data` it upserts a hypothetical allocation, otherwise it
//! records an `ADD`, `REMOVE` or `MODIFY` change to the resource pool.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::catalog::validate_refs;
use resourcepulse_core::error::CoreError;
use resourcepulse_core::scenario::{self, ResourceChangeType};
use resourcepulse_core::types::DbId;
use resourcepulse_db::models::resource_change::{
    ResourceChangeValues, ScenarioResourceChange, ScenarioResourceRequest,
};
use resourcepulse_db::models::scenario_allocation::ScenarioAllocation;
use resourcepulse_db::repositories::{ResourceChangeRepo, ResourceRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::handlers::allocation::upsert_allocation;
use crate::handlers::scenario::ensure_whatif_scenario;
use crate::response::DataResponse;
use crate::state::AppState;

/// What a `POST /scenarios/{id}/resources` call wrote.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResourceOutcome {
    Allocation(ScenarioAllocation),
    Change(ScenarioResourceChange),
}

/// Validate a resource change request and normalise it for storage.
fn change_values(input: ScenarioResourceRequest) -> Result<ResourceChangeValues, CoreError> {
    let change_type: ResourceChangeType = input
        .change_type
        .as_deref()
        .ok_or_else(|| {
            CoreError::Validation(
                "change_type is required unless resource_id and allocation_data are given"
                    .to_string(),
            )
        })?
        .parse()?;

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    scenario::validate_resource_change(
        change_type,
        input.resource_id,
        name.as_deref(),
        input.role_id,
    )?;
    scenario::validate_non_negative("hourly_rate", input.hourly_rate)?;
    scenario::validate_non_negative("billable_rate", input.billable_rate)?;
    validate_refs("skills", &input.skills)?;

    Ok(ResourceChangeValues {
        resource_id: input.resource_id,
        change_type,
        name,
        role_id: input.role_id,
        skills: input.skills,
        hourly_rate: input.hourly_rate,
        billable_rate: input.billable_rate,
        notes: input.notes,
    })
}

// ---------------------------------------------------------------------------
// POST /scenarios/{id}/resources
// ---------------------------------------------------------------------------

pub async fn upsert(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
    Json(mut input): Json<ScenarioResourceRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;

    if let (Some(resource_id), Some(data)) = (input.resource_id, input.allocation_data.take()) {
        let allocation = upsert_allocation(&state, scenario_id, resource_id, &data).await?;
        return Ok(Json(DataResponse {
            data: ResourceOutcome::Allocation(allocation),
        }));
    }

    let values = change_values(input)?;
    if let Some(resource_id) = values.resource_id {
        if ResourceRepo::find_by_id(&state.pool, resource_id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Resource",
                id: resource_id,
            }));
        }
    }

    let change = ResourceChangeRepo::upsert(&state.pool, scenario_id, &values).await?;

    tracing::info!(
        scenario_id,
        change_id = change.id,
        change_type = %values.change_type,
        resource_id = ?values.resource_id,
        "Resource change recorded"
    );
    Ok(Json(DataResponse {
        data: ResourceOutcome::Change(change),
    }))
}

// ---------------------------------------------------------------------------
// GET /scenarios/{id}/resource-changes
// ---------------------------------------------------------------------------

pub async fn list(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    let changes = ResourceChangeRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: changes }))
}

// ---------------------------------------------------------------------------
// DELETE /scenarios/{id}/resource-changes/{change_id}
// ---------------------------------------------------------------------------

pub async fn delete(
    State(state): State<AppState>,
    Path((scenario_id, change_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    if ResourceChangeRepo::delete(&state.pool, scenario_id, change_id).await? {
        tracing::info!(scenario_id, change_id, "Resource change removed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Resource change",
            id: change_id,
        }))
    }
}
