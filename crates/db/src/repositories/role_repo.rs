//! Repository for the `roles` catalog.

use sqlx::PgPool;

use crate::models::catalog::Role;

const COLUMNS: &str = "id, name, created_at, updated_at";

/// Provides access to the roles catalog.
pub struct RoleRepo;

impl RoleRepo {
    /// Insert a role, returning the created row.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Role, sqlx::Error> {
        let query = format!("INSERT INTO roles (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Role>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List all roles ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM roles ORDER BY name");
        sqlx::query_as::<_, Role>(&query).fetch_all(pool).await
    }
}
