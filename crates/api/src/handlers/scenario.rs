//! Handlers for the `/scenarios` resource.
//!
//! Scenario headers only; allocations, timeline and resource changes live in
//! their own handler modules.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::error::CoreError;
use resourcepulse_core::scenario::{self, SCENARIO_TYPE_WHATIF};
use resourcepulse_core::types::DbId;
use resourcepulse_db::models::scenario::{
    CreateScenario, NewScenario, Scenario, ScenarioDetail, UpdateScenario,
};
use resourcepulse_db::repositories::{
    ResourceChangeRepo, ScenarioAllocationRepo, ScenarioRepo, TimelineChangeRepo,
};
use resourcepulse_db::schema::{
    TableCatalog, SCENARIO_ALLOCATIONS, SCENARIO_RESOURCE_CHANGES, SCENARIO_TIMELINE_CHANGES,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a what-if scenario or fail with 404.
///
/// Comparison rows share the table but are not addressable here.
pub(crate) async fn ensure_whatif_scenario(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<Scenario> {
    ScenarioRepo::find_by_id_and_type(pool, id, SCENARIO_TYPE_WHATIF)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "Scenario",
                id,
            })
        })
}

// ---------------------------------------------------------------------------
// POST /scenarios
// ---------------------------------------------------------------------------

/// Create a what-if scenario, optionally cloning a base scenario's
/// allocations.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateScenario>,
) -> AppResult<impl IntoResponse> {
    let name = input.name.as_deref().unwrap_or_default().trim().to_string();
    scenario::validate_scenario_name(&name)?;
    let (start_date, end_date) =
        scenario::require_date_range("Scenario", input.start_date, input.end_date)?;

    if input.clone_from_base_scenario && input.base_scenario_id.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "clone_from_base_scenario requires base_scenario_id".to_string(),
        )));
    }
    if let Some(base_id) = input.base_scenario_id {
        ensure_whatif_scenario(&state.pool, base_id).await?;
    }

    let new = NewScenario {
        name,
        description: input.description,
        scenario_type: SCENARIO_TYPE_WHATIF,
        base_scenario_id: input.base_scenario_id,
        start_date,
        end_date,
        comparison_data: None,
    };

    let (created, cloned) = match input.base_scenario_id {
        Some(base_id) if input.clone_from_base_scenario => {
            ScenarioRepo::create_cloned(&state.pool, &new, base_id).await?
        }
        _ => (ScenarioRepo::create(&state.pool, &new).await?, 0),
    };

    tracing::info!(
        scenario_id = created.id,
        base_scenario_id = ?created.base_scenario_id,
        cloned_allocations = cloned,
        "Scenario created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /scenarios
// ---------------------------------------------------------------------------

/// List what-if scenarios, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let scenarios = ScenarioRepo::list_by_type(&state.pool, SCENARIO_TYPE_WHATIF).await?;
    tracing::debug!(count = scenarios.len(), "Listed scenarios");
    Ok(Json(DataResponse { data: scenarios }))
}

// ---------------------------------------------------------------------------
// GET /scenarios/{id}
// ---------------------------------------------------------------------------

/// Scenario with its allocations, timeline changes and resource changes.
///
/// A change table that does not exist in this database yields an empty list.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let pool = &state.pool;
    let scenario = ensure_whatif_scenario(pool, id).await?;

    let allocations = if pool.has_table(SCENARIO_ALLOCATIONS).await? {
        ScenarioAllocationRepo::list_by_scenario(pool, id).await?
    } else {
        Vec::new()
    };
    let timeline_changes = if pool.has_table(SCENARIO_TIMELINE_CHANGES).await? {
        TimelineChangeRepo::list_by_scenario(pool, id).await?
    } else {
        Vec::new()
    };
    let resource_changes = if pool.has_table(SCENARIO_RESOURCE_CHANGES).await? {
        ResourceChangeRepo::list_by_scenario(pool, id).await?
    } else {
        Vec::new()
    };

    Ok(Json(DataResponse {
        data: ScenarioDetail {
            scenario,
            allocations,
            timeline_changes,
            resource_changes,
        },
    }))
}

// ---------------------------------------------------------------------------
// PUT /scenarios/{id}
// ---------------------------------------------------------------------------

/// Partially update a scenario header.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateScenario>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_whatif_scenario(&state.pool, id).await?;

    if let Some(name) = input.name.as_mut() {
        *name = name.trim().to_string();
        scenario::validate_scenario_name(name)?;
    }
    scenario::validate_date_range(
        "Scenario",
        input.start_date.unwrap_or(existing.start_date),
        input.end_date.unwrap_or(existing.end_date),
    )?;

    let updated = ScenarioRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scenario",
            id,
        }))?;

    tracing::info!(scenario_id = id, "Scenario updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /scenarios/{id}
// ---------------------------------------------------------------------------

/// Delete a scenario and, by cascade, every change recorded in it.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    ensure_whatif_scenario(&state.pool, id).await?;
    let deleted = ScenarioRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(scenario_id = id, "Scenario deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Scenario",
            id,
        }))
    }
}
