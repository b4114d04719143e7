//! Hypothetical allocation models and DTOs.

use resourcepulse_core::catalog::CatalogRef;
use resourcepulse_core::metrics::AllocationFacts;
use resourcepulse_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::allocation::AllocationValues;

/// A row from the `scenario_allocations` table.
///
/// At most one row exists per (scenario, resource, project).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScenarioAllocation {
    pub id: DbId,
    pub scenario_id: DbId,
    pub resource_id: DbId,
    pub project_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub utilization: i32,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub total_hours: Option<f64>,
    pub required_skills: Json<Vec<CatalogRef>>,
    pub required_roles: Json<Vec<CatalogRef>>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Allocation fields supplied when upserting by (resource, project).
#[derive(Debug, Clone, Deserialize)]
pub struct AllocationData {
    pub project_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub utilization: i32,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub total_hours: Option<f64>,
    #[serde(default)]
    pub required_skills: Vec<CatalogRef>,
    #[serde(default)]
    pub required_roles: Vec<CatalogRef>,
    pub notes: Option<String>,
}

/// Input for updating an existing scenario allocation (all fields optional).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateScenarioAllocation {
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub utilization: Option<i32>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub total_hours: Option<f64>,
    pub required_skills: Option<Vec<CatalogRef>>,
    pub required_roles: Option<Vec<CatalogRef>>,
    pub notes: Option<String>,
}

impl From<&ScenarioAllocation> for AllocationFacts {
    fn from(a: &ScenarioAllocation) -> Self {
        AllocationFacts {
            resource_id: a.resource_id,
            project_id: a.project_id,
            start_date: a.start_date,
            end_date: a.end_date,
            utilization: a.utilization,
            hourly_rate: a.hourly_rate,
            billable_rate: a.billable_rate,
            total_hours: a.total_hours,
            required_skills: a.required_skills.0.clone(),
        }
    }
}

impl From<&ScenarioAllocation> for AllocationValues {
    fn from(a: &ScenarioAllocation) -> Self {
        AllocationValues {
            resource_id: a.resource_id,
            project_id: a.project_id,
            start_date: a.start_date,
            end_date: a.end_date,
            utilization: a.utilization,
            hourly_rate: a.hourly_rate,
            billable_rate: a.billable_rate,
            total_hours: a.total_hours,
            notes: a.notes.clone(),
        }
    }
}
