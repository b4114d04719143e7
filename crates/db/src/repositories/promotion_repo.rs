//! The scenario promotion transaction.
//!
//! Applies every recorded change of a what-if scenario to the live tables
//! and deactivates the scenario, all inside a single transaction.

use std::collections::BTreeSet;

use resourcepulse_core::error::CoreError;
use resourcepulse_core::promotion::{
    partition_allocations, removed_resources, resource_action, PromotionSummary, ResourceAction,
};
use resourcepulse_core::scenario::SCENARIO_TYPE_WHATIF;
use resourcepulse_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::allocation::AllocationValues;
use crate::models::resource_change::ScenarioResourceChange;
use crate::models::scenario_allocation::ScenarioAllocation;
use crate::models::timeline_change::ScenarioTimelineChange;
use crate::repositories::{resource_change_repo, scenario_allocation_repo, timeline_change_repo};

/// Errors that can abort a promotion. The transaction is rolled back in
/// every case.
#[derive(Debug, thiserror::Error)]
pub enum PromoteError {
    #[error("Scenario with id {0} not found")]
    NotFound(DbId),

    #[error("Scenario {0} has already been promoted")]
    AlreadyPromoted(DbId),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Runs scenario promotion.
pub struct PromotionRepo;

impl PromotionRepo {
    /// Promote a `WHATIF` scenario into the live tables.
    ///
    /// Only an active scenario can be promoted. The deactivating update is
    /// the first statement, so a concurrent second call either blocks on the
    /// row lock and then sees zero affected rows, or fails outright.
    pub async fn promote(pool: &PgPool, scenario_id: DbId) -> Result<PromotionSummary, PromoteError> {
        let mut tx = pool.begin().await?;

        let claimed = sqlx::query(
            "UPDATE scenarios SET is_active = false
             WHERE id = $1 AND scenario_type = $2 AND is_active = true",
        )
        .bind(scenario_id)
        .bind(SCENARIO_TYPE_WHATIF)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if claimed == 0 {
            let state: Option<(String, bool)> =
                sqlx::query_as("SELECT scenario_type, is_active FROM scenarios WHERE id = $1")
                    .bind(scenario_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Err(match state {
                Some((scenario_type, false)) if scenario_type == SCENARIO_TYPE_WHATIF => {
                    PromoteError::AlreadyPromoted(scenario_id)
                }
                _ => PromoteError::NotFound(scenario_id),
            });
        }

        let mut summary = PromotionSummary {
            scenario_id,
            ..PromotionSummary::default()
        };

        apply_timeline_changes(&mut tx, scenario_id, &mut summary).await?;
        let removed = apply_resource_changes(&mut tx, scenario_id, &mut summary).await?;
        apply_allocations(&mut tx, scenario_id, &removed, &mut summary).await?;

        tx.commit().await?;

        tracing::info!(
            scenario_id,
            timeline_updates = summary.timeline_updates,
            resources_created = summary.resources_created,
            resources_modified = summary.resources_modified,
            allocations_inserted = summary.allocations_inserted,
            allocations_updated = summary.allocations_updated,
            allocations_skipped = summary.allocations_skipped,
            "Scenario promoted",
        );
        Ok(summary)
    }
}

// ---------------------------------------------------------------------------
// Steps
// ---------------------------------------------------------------------------

async fn apply_timeline_changes(
    tx: &mut Transaction<'_, Postgres>,
    scenario_id: DbId,
    summary: &mut PromotionSummary,
) -> Result<(), PromoteError> {
    let query = format!(
        "SELECT {} FROM scenario_timeline_changes WHERE scenario_id = $1 ORDER BY project_id",
        timeline_change_repo::COLUMNS
    );
    let changes = sqlx::query_as::<_, ScenarioTimelineChange>(&query)
        .bind(scenario_id)
        .fetch_all(&mut **tx)
        .await?;

    for change in &changes {
        let updated = sqlx::query("UPDATE projects SET start_date = $2, end_date = $3 WHERE id = $1")
            .bind(change.project_id)
            .bind(change.new_start_date)
            .bind(change.new_end_date)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        summary.timeline_updates += updated;
    }
    Ok(())
}

/// Applies `ADD` and `MODIFY` changes and returns the resources marked
/// `REMOVE`.
async fn apply_resource_changes(
    tx: &mut Transaction<'_, Postgres>,
    scenario_id: DbId,
    summary: &mut PromotionSummary,
) -> Result<BTreeSet<DbId>, PromoteError> {
    let query = format!(
        "SELECT {} FROM scenario_resource_changes WHERE scenario_id = $1 ORDER BY id",
        resource_change_repo::COLUMNS
    );
    let changes = sqlx::query_as::<_, ScenarioResourceChange>(&query)
        .bind(scenario_id)
        .fetch_all(&mut **tx)
        .await?;

    let mut kinds = Vec::with_capacity(changes.len());
    for change in &changes {
        let kind = change.kind()?;
        kinds.push((kind, change.resource_id));

        match resource_action(kind, change.resource_id) {
            ResourceAction::Create => {
                let name = change.name.as_deref().ok_or_else(|| {
                    CoreError::Internal(format!("Resource change {} has no name", change.id))
                })?;
                sqlx::query(
                    "INSERT INTO resources (name, role_id, hourly_rate, billable_rate)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(name)
                .bind(change.role_id)
                .bind(change.hourly_rate)
                .bind(change.billable_rate)
                .execute(&mut **tx)
                .await?;
                summary.resources_created += 1;
            }
            ResourceAction::MergeRates { resource_id } => {
                summary.resources_modified += sqlx::query(
                    "UPDATE resources SET
                        hourly_rate = COALESCE($2, hourly_rate),
                        billable_rate = COALESCE($3, billable_rate)
                     WHERE id = $1",
                )
                .bind(resource_id)
                .bind(change.hourly_rate)
                .bind(change.billable_rate)
                .execute(&mut **tx)
                .await?
                .rows_affected();
            }
            ResourceAction::Exclude { .. } => summary.resources_excluded += 1,
            ResourceAction::Ignore => {}
        }
    }

    Ok(removed_resources(kinds))
}

async fn apply_allocations(
    tx: &mut Transaction<'_, Postgres>,
    scenario_id: DbId,
    removed: &BTreeSet<DbId>,
    summary: &mut PromotionSummary,
) -> Result<(), PromoteError> {
    let query = format!(
        "SELECT {} FROM scenario_allocations WHERE scenario_id = $1 ORDER BY id",
        scenario_allocation_repo::COLUMNS
    );
    let allocations = sqlx::query_as::<_, ScenarioAllocation>(&query)
        .bind(scenario_id)
        .fetch_all(&mut **tx)
        .await?;

    let (apply, skipped) = partition_allocations(allocations, removed, |a| a.resource_id);
    summary.allocations_skipped = skipped.len() as u64;

    for allocation in &apply {
        let values = AllocationValues::from(allocation);

        let existing: Option<(DbId,)> = sqlx::query_as(
            "SELECT id FROM allocations
             WHERE resource_id = $1 AND project_id = $2
             ORDER BY id
             LIMIT 1
             FOR UPDATE",
        )
        .bind(values.resource_id)
        .bind(values.project_id)
        .fetch_optional(&mut **tx)
        .await?;

        match existing {
            Some((id,)) => {
                sqlx::query(
                    "UPDATE allocations SET
                        start_date = $2, end_date = $3, utilization = $4, hourly_rate = $5,
                        billable_rate = $6, total_hours = $7, notes = $8
                     WHERE id = $1",
                )
                .bind(id)
                .bind(values.start_date)
                .bind(values.end_date)
                .bind(values.utilization)
                .bind(values.hourly_rate)
                .bind(values.billable_rate)
                .bind(values.total_hours)
                .bind(&values.notes)
                .execute(&mut **tx)
                .await?;
                summary.allocations_updated += 1;
            }
            None => {
                sqlx::query(
                    "INSERT INTO allocations
                        (resource_id, project_id, start_date, end_date, utilization,
                         hourly_rate, billable_rate, total_hours, notes)
                     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
                )
                .bind(values.resource_id)
                .bind(values.project_id)
                .bind(values.start_date)
                .bind(values.end_date)
                .bind(values.utilization)
                .bind(values.hourly_rate)
                .bind(values.billable_rate)
                .bind(values.total_hours)
                .bind(&values.notes)
                .execute(&mut **tx)
                .await?;
                summary.allocations_inserted += 1;
            }
        }
    }

    if !skipped.is_empty() {
        tracing::debug!(
            scenario_id,
            skipped = skipped.len(),
            "Skipped allocations of removed resources",
        );
    }
    Ok(())
}
