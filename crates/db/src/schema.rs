//! Schema capability probing.
//!
//! Some deployments run against partially migrated databases. Callers that
//! can degrade gracefully ask the store whether a table exists instead of
//! catching query failures.

use async_trait::async_trait;
use sqlx::PgPool;

/// Tables whose absence scenario detail retrieval tolerates.
pub const SCENARIO_ALLOCATIONS: &str = "scenario_allocations";
pub const SCENARIO_TIMELINE_CHANGES: &str = "scenario_timeline_changes";
pub const SCENARIO_RESOURCE_CHANGES: &str = "scenario_resource_changes";

/// A store that can report which tables it has.
#[async_trait]
pub trait TableCatalog {
    /// Whether `name` exists as a table in the current schema search path.
    async fn has_table(&self, name: &str) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl TableCatalog for PgPool {
    async fn has_table(&self, name: &str) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT to_regclass($1::text) IS NOT NULL")
            .bind(name)
            .fetch_one(self)
            .await?;
        Ok(row.0)
    }
}
