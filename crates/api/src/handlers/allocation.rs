//! Handlers for hypothetical allocations under `/scenarios/{id}/allocations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::catalog::validate_refs;
use resourcepulse_core::error::CoreError;
use resourcepulse_core::scenario;
use resourcepulse_core::types::DbId;
use resourcepulse_db::models::scenario_allocation::{
    AllocationData, ScenarioAllocation, UpdateScenarioAllocation,
};
use resourcepulse_db::repositories::{ProjectRepo, ResourceRepo, ScenarioAllocationRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::scenario::ensure_whatif_scenario;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_allocation_data(data: &AllocationData) -> Result<(), CoreError> {
    scenario::validate_date_range("Allocation", data.start_date, data.end_date)?;
    scenario::validate_utilization(data.utilization)?;
    scenario::validate_non_negative("hourly_rate", data.hourly_rate)?;
    scenario::validate_non_negative("billable_rate", data.billable_rate)?;
    scenario::validate_non_negative("total_hours", data.total_hours)?;
    validate_refs("required_skills", &data.required_skills)?;
    validate_refs("required_roles", &data.required_roles)?;
    Ok(())
}

fn validate_allocation_update(
    existing: &ScenarioAllocation,
    input: &UpdateScenarioAllocation,
) -> Result<(), CoreError> {
    scenario::validate_date_range(
        "Allocation",
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;
    if let Some(utilization) = input.utilization {
        scenario::validate_utilization(utilization)?;
    }
    scenario::validate_non_negative("hourly_rate", input.hourly_rate)?;
    scenario::validate_non_negative("billable_rate", input.billable_rate)?;
    scenario::validate_non_negative("total_hours", input.total_hours)?;
    if let Some(skills) = &input.required_skills {
        validate_refs("required_skills", skills)?;
    }
    if let Some(roles) = &input.required_roles {
        validate_refs("required_roles", roles)?;
    }
    Ok(())
}

/// Upsert the allocation of `resource_id` described by `data`.
///
/// Shared with the dual-purpose `POST /scenarios/{id}/resources` handler.
pub(crate) async fn upsert_allocation(
    state: &AppState,
    scenario_id: DbId,
    resource_id: DbId,
    data: &AllocationData,
) -> AppResult<ScenarioAllocation> {
    validate_allocation_data(data)?;

    if ResourceRepo::find_by_id(&state.pool, resource_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Resource",
            id: resource_id,
        }));
    }
    if ProjectRepo::find_by_id(&state.pool, data.project_id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: data.project_id,
        }));
    }

    let allocation =
        ScenarioAllocationRepo::upsert(&state.pool, scenario_id, resource_id, data).await?;

    tracing::info!(
        scenario_id,
        allocation_id = allocation.id,
        resource_id,
        project_id = data.project_id,
        utilization = data.utilization,
        "Scenario allocation upserted"
    );
    Ok(allocation)
}

// ---------------------------------------------------------------------------
// GET /scenarios/{id}/allocations
// ---------------------------------------------------------------------------

/// List the hypothetical allocations of a scenario.
pub async fn list(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    let allocations = ScenarioAllocationRepo::list_by_scenario(&state.pool, scenario_id).await?;
    Ok(Json(DataResponse { data: allocations }))
}

// ---------------------------------------------------------------------------
// PUT /scenarios/{id}/allocations/{allocation_id}
// ---------------------------------------------------------------------------

/// Partially update one hypothetical allocation.
pub async fn update(
    State(state): State<AppState>,
    Path((scenario_id, allocation_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateScenarioAllocation>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Scenario allocation",
            id: allocation_id,
        })
    };

    let existing = ScenarioAllocationRepo::find_by_id(&state.pool, scenario_id, allocation_id)
        .await?
        .ok_or_else(not_found)?;
    validate_allocation_update(&existing, &input)?;

    let updated = ScenarioAllocationRepo::update(&state.pool, scenario_id, allocation_id, &input)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(scenario_id, allocation_id, "Scenario allocation updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /scenarios/{id}/allocations/{allocation_id}
// ---------------------------------------------------------------------------

pub async fn delete(
    State(state): State<AppState>,
    Path((scenario_id, allocation_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;
    if ScenarioAllocationRepo::delete(&state.pool, scenario_id, allocation_id).await? {
        tracing::info!(scenario_id, allocation_id, "Scenario allocation deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Scenario allocation",
            id: allocation_id,
        }))
    }
}
