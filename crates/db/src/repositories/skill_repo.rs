//! Repository for the `skills` catalog.

use sqlx::PgPool;

use crate::models::catalog::{CreateSkill, Skill};

const COLUMNS: &str = "id, name, category, created_at, updated_at";

/// Provides access to the skills catalog.
pub struct SkillRepo;

impl SkillRepo {
    /// Insert a skill, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSkill) -> Result<Skill, sqlx::Error> {
        let query = format!(
            "INSERT INTO skills (name, category) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Skill>(&query)
            .bind(&input.name)
            .bind(&input.category)
            .fetch_one(pool)
            .await
    }

    /// List all skills ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills ORDER BY name");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }
}
