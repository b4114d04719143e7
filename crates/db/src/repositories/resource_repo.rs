//! Repository for the live `resources` table.

use resourcepulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::resource::{CreateResource, Resource};

/// Column list shared across queries.
pub(crate) const COLUMNS: &str = "id, name, role_id, hourly_rate, billable_rate, \
    is_active, created_at, updated_at";

/// Provides CRUD operations for live resources.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Insert a resource, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateResource) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (name, role_id, hourly_rate, billable_rate)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(&input.name)
            .bind(input.role_id)
            .bind(input.hourly_rate)
            .bind(input.billable_rate)
            .fetch_one(pool)
            .await
    }

    /// Find a resource by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load all resources with the given ids, in id order.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Resource>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List resources with names matching exactly, newest first.
    pub async fn list_by_name(pool: &PgPool, name: &str) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM resources WHERE name = $1 ORDER BY id DESC");
        sqlx::query_as::<_, Resource>(&query)
            .bind(name)
            .fetch_all(pool)
            .await
    }
}
