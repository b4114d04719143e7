//! Handlers for scenario comparison.
//!
//! `POST /compare` assembles a comparison from stored metrics documents.
//! Named comparisons are persisted as `COMPARISON` scenario rows; unnamed
//! ones are returned with the ephemeral id and not stored.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use resourcepulse_core::comparison::{
    self, ComparisonData, ScenarioSnapshot, EPHEMERAL_COMPARISON_ID,
};
use resourcepulse_core::error::CoreError;
use resourcepulse_core::metrics::ScenarioMetrics;
use resourcepulse_core::scenario::{self, SCENARIO_TYPE_COMPARISON, SCENARIO_TYPE_WHATIF};
use resourcepulse_core::types::{DbId, Timestamp};
use resourcepulse_db::models::scenario::{NewScenario, Scenario};
use resourcepulse_db::repositories::ScenarioRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /compare`.
#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    #[serde(default)]
    pub scenario_ids: Vec<DbId>,
    #[serde(default)]
    pub metrics: Vec<String>,
    /// When present the comparison is persisted under this name.
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A comparison as returned to clients.
#[derive(Debug, Serialize)]
pub struct ComparisonResponse {
    /// Row id, or [`EPHEMERAL_COMPARISON_ID`] when not persisted.
    pub id: DbId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created_at: Option<Timestamp>,
    pub comparison: ComparisonData,
}

impl TryFrom<Scenario> for ComparisonResponse {
    type Error = AppError;

    fn try_from(row: Scenario) -> Result<Self, Self::Error> {
        let document = row.comparison_data.ok_or_else(|| {
            AppError::InternalError(format!("Comparison {} has no comparison data", row.id))
        })?;
        let comparison = serde_json::from_value(document).map_err(|e| {
            AppError::InternalError(format!("Comparison {} is unreadable: {e}", row.id))
        })?;
        Ok(Self {
            id: row.id,
            name: Some(row.name),
            description: row.description,
            created_at: Some(row.created_at),
            comparison,
        })
    }
}

// ---------------------------------------------------------------------------
// POST /compare
// ---------------------------------------------------------------------------

pub async fn compare(
    State(state): State<AppState>,
    Json(input): Json<CompareRequest>,
) -> AppResult<impl IntoResponse> {
    let metrics = comparison::validate_comparison_request(&input.scenario_ids, &input.metrics)?;

    let rows =
        ScenarioRepo::list_by_ids(&state.pool, &input.scenario_ids, SCENARIO_TYPE_WHATIF).await?;

    // Keep request order; any id without a row fails the whole request.
    let mut ordered: Vec<&Scenario> = Vec::with_capacity(input.scenario_ids.len());
    for &id in &input.scenario_ids {
        let row = rows.iter().find(|s| s.id == id).ok_or(AppError::Core(
            CoreError::NotFound {
                entity: "Scenario",
                id,
            },
        ))?;
        ordered.push(row);
    }

    let snapshots = ordered
        .iter()
        .map(|s| -> AppResult<ScenarioSnapshot> {
            let metrics = s
                .metrics_data
                .clone()
                .map(serde_json::from_value::<ScenarioMetrics>)
                .transpose()
                .map_err(|e| {
                    AppError::InternalError(format!(
                        "Stored metrics of scenario {} are unreadable: {e}",
                        s.id
                    ))
                })?;
            Ok(ScenarioSnapshot {
                scenario_id: s.id,
                name: s.name.clone(),
                metrics,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let data = comparison::build_comparison(&snapshots, &metrics)?;

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());

    let Some(name) = name else {
        tracing::debug!(
            scenarios = snapshots.len(),
            metrics = metrics.len(),
            "Ephemeral comparison built"
        );
        return Ok((
            StatusCode::OK,
            Json(DataResponse {
                data: ComparisonResponse {
                    id: EPHEMERAL_COMPARISON_ID,
                    name: None,
                    description: input.description,
                    created_at: None,
                    comparison: data,
                },
            }),
        ));
    };
    scenario::validate_scenario_name(&name)?;

    // The comparison row spans the dates of everything it compares.
    let start_date = ordered.iter().map(|s| s.start_date).min();
    let end_date = ordered.iter().map(|s| s.end_date).max();
    let (start_date, end_date) = scenario::require_date_range("Comparison", start_date, end_date)?;

    let document =
        serde_json::to_value(&data).map_err(|e| AppError::InternalError(e.to_string()))?;
    let row = ScenarioRepo::create(
        &state.pool,
        &NewScenario {
            name,
            description: input.description,
            scenario_type: SCENARIO_TYPE_COMPARISON,
            base_scenario_id: None,
            start_date,
            end_date,
            comparison_data: Some(document),
        },
    )
    .await?;

    tracing::info!(
        comparison_id = row.id,
        scenario_ids = ?input.scenario_ids,
        "Comparison saved"
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: ComparisonResponse {
                id: row.id,
                name: Some(row.name),
                description: row.description,
                created_at: Some(row.created_at),
                comparison: data,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /comparisons
// ---------------------------------------------------------------------------

/// List persisted comparisons, newest first.
pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = ScenarioRepo::list_comparisons(&state.pool).await?;
    let comparisons = rows
        .into_iter()
        .map(ComparisonResponse::try_from)
        .collect::<AppResult<Vec<_>>>()?;
    Ok(Json(DataResponse { data: comparisons }))
}

// ---------------------------------------------------------------------------
// GET /comparisons/{id}
// ---------------------------------------------------------------------------

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let row = ScenarioRepo::find_by_id_and_type(&state.pool, id, SCENARIO_TYPE_COMPARISON)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Comparison",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: ComparisonResponse::try_from(row)?,
    }))
}
