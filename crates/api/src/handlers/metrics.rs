//! Handlers for scenario metrics.
//!
//! Calculation always recomputes from the scenario's current rows and
//! replaces the stored document.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use resourcepulse_core::catalog::{Catalog, CatalogEntry};
use resourcepulse_core::error::CoreError;
use resourcepulse_core::metrics::{self, AllocationFacts, MetricsInput, TimelineFacts};
use resourcepulse_core::types::DbId;
use resourcepulse_db::repositories::{
    ProjectRepo, ResourceChangeRepo, ResourceRepo, RoleRepo, ScenarioAllocationRepo,
    ScenarioRepo, SkillRepo, TimelineChangeRepo,
};

use crate::error::{AppError, AppResult};
use crate::handlers::scenario::ensure_whatif_scenario;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load everything the calculator needs for one scenario.
async fn load_input(pool: &sqlx::PgPool, scenario_id: DbId) -> AppResult<MetricsInput> {
    let allocations = ScenarioAllocationRepo::list_by_scenario(pool, scenario_id).await?;
    let timeline = TimelineChangeRepo::list_by_scenario(pool, scenario_id).await?;
    let changes = ResourceChangeRepo::list_by_scenario(pool, scenario_id).await?;

    let mut resource_ids: Vec<DbId> = allocations
        .iter()
        .map(|a| a.resource_id)
        .chain(changes.iter().filter_map(|c| c.resource_id))
        .collect();
    resource_ids.sort_unstable();
    resource_ids.dedup();

    let mut project_ids: Vec<DbId> = allocations
        .iter()
        .map(|a| a.project_id)
        .chain(timeline.iter().map(|t| t.project_id))
        .collect();
    project_ids.sort_unstable();
    project_ids.dedup();

    let resources = ResourceRepo::list_by_ids(pool, &resource_ids).await?;
    let projects = ProjectRepo::list_by_ids(pool, &project_ids).await?;
    let skills = SkillRepo::list(pool).await?;
    let roles = RoleRepo::list(pool).await?;

    Ok(MetricsInput {
        allocations: allocations.iter().map(AllocationFacts::from).collect(),
        timeline_changes: timeline.iter().map(TimelineFacts::from).collect(),
        resource_changes: changes
            .iter()
            .map(|c| c.facts())
            .collect::<Result<Vec<_>, _>>()?,
        resources: resources.into_iter().map(Into::into).collect(),
        projects: projects.into_iter().map(Into::into).collect(),
        skills: Catalog::new(skills.into_iter().map(CatalogEntry::from)),
        roles: Catalog::new(roles.into_iter().map(CatalogEntry::from)),
    })
}

// ---------------------------------------------------------------------------
// POST /scenarios/{id}/calculate-metrics
// ---------------------------------------------------------------------------

/// Recompute and store the metrics document of a scenario.
pub async fn calculate(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_whatif_scenario(&state.pool, scenario_id).await?;

    let input = load_input(&state.pool, scenario_id).await?;
    let result = metrics::calculate_metrics(&input, Utc::now());

    let document =
        serde_json::to_value(&result).map_err(|e| AppError::InternalError(e.to_string()))?;
    ScenarioRepo::save_metrics(&state.pool, scenario_id, &document)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Scenario",
            id: scenario_id,
        }))?;

    tracing::info!(
        scenario_id,
        allocations = input.allocations.len(),
        overall_utilization = result.utilization.overall,
        total_cost = result.costs.total_cost,
        coverage = result.skills.coverage_percentage,
        "Scenario metrics calculated"
    );
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// GET /scenarios/{id}/metrics
// ---------------------------------------------------------------------------

/// Return the stored metrics document without recalculating.
pub async fn get_stored(
    State(state): State<AppState>,
    Path(scenario_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let scenario = ensure_whatif_scenario(&state.pool, scenario_id).await?;
    let document = scenario.metrics_data.ok_or(AppError::Core(CoreError::NotFound {
        entity: "Metrics for scenario",
        id: scenario_id,
    }))?;
    Ok(Json(DataResponse { data: document }))
}
