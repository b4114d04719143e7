//! Repository for the live `projects` table.

use resourcepulse_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project};

const COLUMNS: &str = "id, name, start_date, end_date, budget, created_at, updated_at";

/// Provides CRUD operations for live projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, start_date, end_date, budget)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Load all projects with the given ids, in id order.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ANY($1) ORDER BY id");
        sqlx::query_as::<_, Project>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
