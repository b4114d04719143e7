//! Repository for the `scenario_resource_changes` table.

use resourcepulse_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::resource_change::{ResourceChangeValues, ScenarioResourceChange};

/// Column list shared across queries.
pub(crate) const COLUMNS: &str = "id, scenario_id, resource_id, change_type, name, role_id, \
    skills, hourly_rate, billable_rate, notes, created_at, updated_at";

/// Provides CRUD operations for proposed resource changes.
pub struct ResourceChangeRepo;

impl ResourceChangeRepo {
    /// Find the change already recorded for the same target.
    ///
    /// Existing resources are matched by id. `ADD` changes without a
    /// resource id are matched by case-insensitive name.
    pub async fn find_existing(
        pool: &PgPool,
        scenario_id: DbId,
        input: &ResourceChangeValues,
    ) -> Result<Option<ScenarioResourceChange>, sqlx::Error> {
        match (input.resource_id, input.name.as_deref()) {
            (Some(resource_id), _) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM scenario_resource_changes
                     WHERE scenario_id = $1 AND resource_id = $2"
                );
                sqlx::query_as::<_, ScenarioResourceChange>(&query)
                    .bind(scenario_id)
                    .bind(resource_id)
                    .fetch_optional(pool)
                    .await
            }
            (None, Some(name)) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM scenario_resource_changes
                     WHERE scenario_id = $1 AND resource_id IS NULL AND lower(name) = lower($2)
                     ORDER BY id
                     LIMIT 1"
                );
                sqlx::query_as::<_, ScenarioResourceChange>(&query)
                    .bind(scenario_id)
                    .bind(name)
                    .fetch_optional(pool)
                    .await
            }
            (None, None) => Ok(None),
        }
    }

    /// Record a change, replacing the one already recorded for the same target.
    pub async fn upsert(
        pool: &PgPool,
        scenario_id: DbId,
        input: &ResourceChangeValues,
    ) -> Result<ScenarioResourceChange, sqlx::Error> {
        if let Some(existing) = Self::find_existing(pool, scenario_id, input).await? {
            let query = format!(
                "UPDATE scenario_resource_changes SET
                    change_type = $2,
                    name = $3,
                    role_id = $4,
                    skills = $5,
                    hourly_rate = $6,
                    billable_rate = $7,
                    notes = $8
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            );
            return sqlx::query_as::<_, ScenarioResourceChange>(&query)
                .bind(existing.id)
                .bind(input.change_type.as_str())
                .bind(&input.name)
                .bind(input.role_id)
                .bind(Json(&input.skills))
                .bind(input.hourly_rate)
                .bind(input.billable_rate)
                .bind(&input.notes)
                .fetch_one(pool)
                .await;
        }

        let query = format!(
            "INSERT INTO scenario_resource_changes
                (scenario_id, resource_id, change_type, name, role_id, skills,
                 hourly_rate, billable_rate, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ScenarioResourceChange>(&query)
            .bind(scenario_id)
            .bind(input.resource_id)
            .bind(input.change_type.as_str())
            .bind(&input.name)
            .bind(input.role_id)
            .bind(Json(&input.skills))
            .bind(input.hourly_rate)
            .bind(input.billable_rate)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List resource changes of a scenario in insertion order.
    pub async fn list_by_scenario(
        pool: &PgPool,
        scenario_id: DbId,
    ) -> Result<Vec<ScenarioResourceChange>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenario_resource_changes WHERE scenario_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ScenarioResourceChange>(&query)
            .bind(scenario_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a resource change. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, scenario_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM scenario_resource_changes WHERE id = $1 AND scenario_id = $2")
                .bind(id)
                .bind(scenario_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
