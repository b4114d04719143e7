//! Repository for the `scenarios` table.

use resourcepulse_core::scenario::SCENARIO_TYPE_COMPARISON;
use resourcepulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::scenario::{NewScenario, Scenario, UpdateScenario};

/// Column list shared across queries.
const COLUMNS: &str = "id, name, description, scenario_type, base_scenario_id, \
    start_date, end_date, metrics_data, comparison_data, is_active, created_at, updated_at";

/// Provides CRUD operations for scenarios and persisted comparisons.
pub struct ScenarioRepo;

impl ScenarioRepo {
    /// Insert a new scenario, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewScenario) -> Result<Scenario, sqlx::Error> {
        let query = format!(
            "INSERT INTO scenarios
                (name, description, scenario_type, base_scenario_id, start_date, end_date, comparison_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.scenario_type)
            .bind(input.base_scenario_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.comparison_data)
            .fetch_one(pool)
            .await
    }

    /// Insert a new scenario and copy every allocation of `base_id` into it.
    ///
    /// Both writes share a transaction, so the new scenario is never visible
    /// with a partial allocation set. Returns the row and the number of
    /// allocations copied.
    pub async fn create_cloned(
        pool: &PgPool,
        input: &NewScenario,
        base_id: DbId,
    ) -> Result<(Scenario, u64), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO scenarios
                (name, description, scenario_type, base_scenario_id, start_date, end_date, comparison_data)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let scenario = sqlx::query_as::<_, Scenario>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.scenario_type)
            .bind(base_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.comparison_data)
            .fetch_one(&mut *tx)
            .await?;

        let cloned = sqlx::query(
            "INSERT INTO scenario_allocations
                (scenario_id, resource_id, project_id, start_date, end_date, utilization,
                 hourly_rate, billable_rate, total_hours, required_skills, required_roles, notes)
             SELECT $1, resource_id, project_id, start_date, end_date, utilization,
                    hourly_rate, billable_rate, total_hours, required_skills, required_roles, notes
             FROM scenario_allocations
             WHERE scenario_id = $2
             ORDER BY id",
        )
        .bind(scenario.id)
        .bind(base_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        tracing::debug!(
            scenario_id = scenario.id,
            base_scenario_id = base_id,
            cloned,
            "Cloned base scenario allocations",
        );
        Ok((scenario, cloned))
    }

    /// Find a scenario by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Scenario>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenarios WHERE id = $1");
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a scenario of the given type.
    pub async fn find_by_id_and_type(
        pool: &PgPool,
        id: DbId,
        scenario_type: &str,
    ) -> Result<Option<Scenario>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM scenarios WHERE id = $1 AND scenario_type = $2");
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .bind(scenario_type)
            .fetch_optional(pool)
            .await
    }

    /// List scenarios of one type, newest first.
    pub async fn list_by_type(
        pool: &PgPool,
        scenario_type: &str,
    ) -> Result<Vec<Scenario>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenarios
             WHERE scenario_type = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(scenario_type)
            .fetch_all(pool)
            .await
    }

    /// Load scenarios of one type by id. Order is by id; missing ids are
    /// simply absent from the result.
    pub async fn list_by_ids(
        pool: &PgPool,
        ids: &[DbId],
        scenario_type: &str,
    ) -> Result<Vec<Scenario>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenarios
             WHERE id = ANY($1) AND scenario_type = $2
             ORDER BY id"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(ids)
            .bind(scenario_type)
            .fetch_all(pool)
            .await
    }

    /// Update a scenario. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateScenario,
    ) -> Result<Option<Scenario>, sqlx::Error> {
        let query = format!(
            "UPDATE scenarios SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = COALESCE($5, end_date),
                is_active = COALESCE($6, is_active)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Store a freshly computed metrics document on the scenario.
    pub async fn save_metrics(
        pool: &PgPool,
        id: DbId,
        metrics: &serde_json::Value,
    ) -> Result<Option<Scenario>, sqlx::Error> {
        let query = format!(
            "UPDATE scenarios SET metrics_data = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Scenario>(&query)
            .bind(id)
            .bind(metrics)
            .fetch_optional(pool)
            .await
    }

    /// List persisted comparisons, newest first.
    pub async fn list_comparisons(pool: &PgPool) -> Result<Vec<Scenario>, sqlx::Error> {
        Self::list_by_type(pool, SCENARIO_TYPE_COMPARISON).await
    }

    /// Delete a scenario by ID. Returns `true` if a row was removed.
    ///
    /// Allocations and changes cascade. Scenarios cloned from this one keep
    /// their rows with `base_scenario_id` set to `NULL`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM scenarios WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
