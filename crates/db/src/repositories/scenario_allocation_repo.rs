//! Repository for the `scenario_allocations` table.

use resourcepulse_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::scenario_allocation::{
    AllocationData, ScenarioAllocation, UpdateScenarioAllocation,
};

/// Column list shared across queries.
pub(crate) const COLUMNS: &str = "id, scenario_id, resource_id, project_id, start_date, \
    end_date, utilization, hourly_rate, billable_rate, total_hours, required_skills, \
    required_roles, notes, created_at, updated_at";

/// Provides CRUD operations for hypothetical allocations.
pub struct ScenarioAllocationRepo;

impl ScenarioAllocationRepo {
    /// Insert or replace the allocation for (scenario, resource, project).
    pub async fn upsert(
        pool: &PgPool,
        scenario_id: DbId,
        resource_id: DbId,
        input: &AllocationData,
    ) -> Result<ScenarioAllocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenario_allocations
                (scenario_id, resource_id, project_id, start_date, end_date, utilization,
                 hourly_rate, billable_rate, total_hours, required_skills, required_roles, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT ON CONSTRAINT uq_scenario_allocations_scenario_resource_project
             DO UPDATE SET
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                utilization = EXCLUDED.utilization,
                hourly_rate = EXCLUDED.hourly_rate,
                billable_rate = EXCLUDED.billable_rate,
                total_hours = EXCLUDED.total_hours,
                required_skills = EXCLUDED.required_skills,
                required_roles = EXCLUDED.required_roles,
                notes = EXCLUDED.notes
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScenarioAllocation>(&query)
            .bind(scenario_id)
            .bind(resource_id)
            .bind(input.project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.utilization)
            .bind(input.hourly_rate)
            .bind(input.billable_rate)
            .bind(input.total_hours)
            .bind(Json(&input.required_skills))
            .bind(Json(&input.required_roles))
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Find an allocation belonging to a scenario.
    pub async fn find_by_id(
        pool: &PgPool,
        scenario_id: DbId,
        id: DbId,
    ) -> Result<Option<ScenarioAllocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenario_allocations WHERE id = $1 AND scenario_id = $2"
        );
        sqlx::query_as::<_, ScenarioAllocation>(&query)
            .bind(id)
            .bind(scenario_id)
            .fetch_optional(pool)
            .await
    }

    /// List all allocations of a scenario in insertion order.
    pub async fn list_by_scenario(
        pool: &PgPool,
        scenario_id: DbId,
    ) -> Result<Vec<ScenarioAllocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenario_allocations WHERE scenario_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ScenarioAllocation>(&query)
            .bind(scenario_id)
            .fetch_all(pool)
            .await
    }

    /// Update an allocation. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        scenario_id: DbId,
        id: DbId,
        input: &UpdateScenarioAllocation,
    ) -> Result<Option<ScenarioAllocation>, sqlx::Error> {
        let query = format!(
            "UPDATE scenario_allocations SET
                start_date = COALESCE($3, start_date),
                end_date = COALESCE($4, end_date),
                utilization = COALESCE($5, utilization),
                hourly_rate = COALESCE($6, hourly_rate),
                billable_rate = COALESCE($7, billable_rate),
                total_hours = COALESCE($8, total_hours),
                required_skills = COALESCE($9, required_skills),
                required_roles = COALESCE($10, required_roles),
                notes = COALESCE($11, notes)
             WHERE id = $1 AND scenario_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScenarioAllocation>(&query)
            .bind(id)
            .bind(scenario_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.utilization)
            .bind(input.hourly_rate)
            .bind(input.billable_rate)
            .bind(input.total_hours)
            .bind(input.required_skills.as_ref().map(Json))
            .bind(input.required_roles.as_ref().map(Json))
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete an allocation. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, scenario_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM scenario_allocations WHERE id = $1 AND scenario_id = $2")
                .bind(id)
                .bind(scenario_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
