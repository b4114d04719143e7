//! Proposed resource pool change models and DTOs.

use resourcepulse_core::catalog::CatalogRef;
use resourcepulse_core::error::CoreError;
use resourcepulse_core::metrics::ResourceChangeFacts;
use resourcepulse_core::scenario::ResourceChangeType;
use resourcepulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::scenario_allocation::AllocationData;

/// A row from the `scenario_resource_changes` table.
///
/// `resource_id` is `NULL` for `ADD` changes proposing a brand-new resource.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScenarioResourceChange {
    pub id: DbId,
    pub scenario_id: DbId,
    pub resource_id: Option<DbId>,
    pub change_type: String,
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    pub skills: Json<Vec<CatalogRef>>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ScenarioResourceChange {
    /// Parsed change type. The column is constrained by a CHECK, so a
    /// parse failure means the row was written outside this service.
    pub fn kind(&self) -> Result<ResourceChangeType, CoreError> {
        self.change_type.parse().map_err(|_| {
            CoreError::Internal(format!(
                "Resource change {} has unknown change_type '{}'",
                self.id, self.change_type
            ))
        })
    }

    pub fn facts(&self) -> Result<ResourceChangeFacts, CoreError> {
        Ok(ResourceChangeFacts {
            change_type: self.kind()?,
            resource_id: self.resource_id,
            skills: self.skills.0.clone(),
        })
    }
}

/// Request body for `POST /scenarios/{id}/resources`.
///
/// When both `resource_id` and `allocation_data` are present the request is
/// an allocation upsert; otherwise it records a resource change keyed by
/// `change_type`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioResourceRequest {
    pub resource_id: Option<DbId>,
    pub allocation_data: Option<AllocationData>,
    pub change_type: Option<String>,
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    #[serde(default)]
    pub skills: Vec<CatalogRef>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub notes: Option<String>,
}

/// Validated values for a resource change row.
#[derive(Debug, Clone)]
pub struct ResourceChangeValues {
    pub resource_id: Option<DbId>,
    pub change_type: ResourceChangeType,
    pub name: Option<String>,
    pub role_id: Option<DbId>,
    pub skills: Vec<CatalogRef>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub notes: Option<String>,
}
