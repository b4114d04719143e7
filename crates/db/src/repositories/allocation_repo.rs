//! Read access to the live `allocations` table.
//!
//! Writes happen only inside [`PromotionRepo::promote`](super::PromotionRepo::promote).

use resourcepulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::allocation::Allocation;

/// Column list shared across queries.
pub(crate) const COLUMNS: &str = "id, resource_id, project_id, start_date, end_date, \
    utilization, hourly_rate, billable_rate, total_hours, notes, created_at, updated_at";

/// Provides read operations for live allocations.
pub struct AllocationRepo;

impl AllocationRepo {
    /// Find the live allocation for a (resource, project) pair, if any.
    pub async fn find_by_pair(
        pool: &PgPool,
        resource_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Allocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM allocations
             WHERE resource_id = $1 AND project_id = $2
             ORDER BY id
             LIMIT 1"
        );
        sqlx::query_as::<_, Allocation>(&query)
            .bind(resource_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List live allocations for a project.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Allocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM allocations WHERE project_id = $1 ORDER BY resource_id, id"
        );
        sqlx::query_as::<_, Allocation>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
