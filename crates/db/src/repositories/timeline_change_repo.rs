//! Repository for the `scenario_timeline_changes` table.

use resourcepulse_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::project::Project;
use crate::models::timeline_change::ScenarioTimelineChange;

/// Column list shared across queries.
pub(crate) const COLUMNS: &str = "id, scenario_id, project_id, original_start_date, \
    original_end_date, new_start_date, new_end_date, notes, created_at, updated_at";

/// Provides CRUD operations for proposed timeline changes.
pub struct TimelineChangeRepo;

impl TimelineChangeRepo {
    /// Record new dates for a project within a scenario.
    ///
    /// The first write captures the project's live dates as the originals;
    /// later writes replace only the new dates and notes.
    pub async fn upsert(
        pool: &PgPool,
        scenario_id: DbId,
        project: &Project,
        new_start_date: Date,
        new_end_date: Date,
        notes: Option<&str>,
    ) -> Result<ScenarioTimelineChange, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenario_timeline_changes
                (scenario_id, project_id, original_start_date, original_end_date,
                 new_start_date, new_end_date, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_scenario_timeline_changes_scenario_project
             DO UPDATE SET
                new_start_date = EXCLUDED.new_start_date,
                new_end_date = EXCLUDED.new_end_date,
                notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScenarioTimelineChange>(&query)
            .bind(scenario_id)
            .bind(project.id)
            .bind(project.start_date)
            .bind(project.end_date)
            .bind(new_start_date)
            .bind(new_end_date)
            .bind(notes)
            .fetch_one(pool)
            .await
    }

    /// List timeline changes of a scenario ordered by project.
    pub async fn list_by_scenario(
        pool: &PgPool,
        scenario_id: DbId,
    ) -> Result<Vec<ScenarioTimelineChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenario_timeline_changes
             WHERE scenario_id = $1
             ORDER BY project_id"
        );
        sqlx::query_as::<_, ScenarioTimelineChange>(&query)
            .bind(scenario_id)
            .fetch_all(pool)
            .await
    }

    /// Remove the timeline change for a project. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        scenario_id: DbId,
        project_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM scenario_timeline_changes WHERE scenario_id = $1 AND project_id = $2",
        )
        .bind(scenario_id)
        .bind(project_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
