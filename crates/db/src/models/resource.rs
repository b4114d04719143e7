//! Live resource (person) model and DTOs.

use resourcepulse_core::metrics::ResourceFacts;
use resourcepulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resource {
    pub id: DbId,
    pub name: String,
    pub role_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a live resource.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateResource {
    pub name: String,
    pub role_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
}

impl From<Resource> for ResourceFacts {
    fn from(r: Resource) -> Self {
        ResourceFacts {
            id: r.id,
            name: r.name,
            role_id: r.role_id,
            hourly_rate: r.hourly_rate,
            billable_rate: r.billable_rate,
        }
    }
}
