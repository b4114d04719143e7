//! Proposed project timeline change models and DTOs.

use resourcepulse_core::metrics::TimelineFacts;
use resourcepulse_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `scenario_timeline_changes` table.
///
/// The original dates are copied from the live project when the change is
/// first recorded and are never overwritten afterwards.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScenarioTimelineChange {
    pub id: DbId,
    pub scenario_id: DbId,
    pub project_id: DbId,
    pub original_start_date: Option<Date>,
    pub original_end_date: Option<Date>,
    pub new_start_date: Date,
    pub new_end_date: Date,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for recording a timeline change.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTimelineChange {
    pub new_start_date: Option<Date>,
    pub new_end_date: Option<Date>,
    pub notes: Option<String>,
}

impl From<&ScenarioTimelineChange> for TimelineFacts {
    fn from(t: &ScenarioTimelineChange) -> Self {
        TimelineFacts {
            project_id: t.project_id,
            original_start_date: t.original_start_date,
            original_end_date: t.original_end_date,
            new_start_date: t.new_start_date,
            new_end_date: t.new_end_date,
        }
    }
}
