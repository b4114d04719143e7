//! Scenario models and DTOs.
//!
//! A scenario is either a what-if (`WHATIF`) sandbox of hypothetical
//! allocations and changes, or a persisted side-by-side comparison
//! (`COMPARISON`) of what-if scenarios.

use resourcepulse_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::resource_change::ScenarioResourceChange;
use crate::models::scenario_allocation::ScenarioAllocation;
use crate::models::timeline_change::ScenarioTimelineChange;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A row from the `scenarios` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Scenario {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub scenario_type: String,
    pub base_scenario_id: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
    pub metrics_data: Option<serde_json::Value>,
    pub comparison_data: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Request body for creating a what-if scenario.
///
/// Required fields are optional here so that missing values produce a
/// validation error rather than a deserialization rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateScenario {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_scenario_id: Option<DbId>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    #[serde(default)]
    pub clone_from_base_scenario: bool,
}

/// Validated values for a new scenario row.
#[derive(Debug, Clone)]
pub struct NewScenario {
    pub name: String,
    pub description: Option<String>,
    pub scenario_type: &'static str,
    pub base_scenario_id: Option<DbId>,
    pub start_date: Date,
    pub end_date: Date,
    pub comparison_data: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Update DTO
// ---------------------------------------------------------------------------

/// Input for updating an existing scenario (all fields optional).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScenario {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// A scenario together with all of its recorded changes.
#[derive(Debug, Serialize)]
pub struct ScenarioDetail {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub allocations: Vec<ScenarioAllocation>,
    pub timeline_changes: Vec<ScenarioTimelineChange>,
    pub resource_changes: Vec<ScenarioResourceChange>,
}
