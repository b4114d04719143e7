//! Skill and role catalog rows.

use resourcepulse_core::catalog::CatalogEntry;
use resourcepulse_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub id: DbId,
    pub name: String,
    pub category: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a skill.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSkill {
    pub name: String,
    pub category: Option<String>,
}

impl From<Role> for CatalogEntry {
    fn from(role: Role) -> Self {
        CatalogEntry {
            id: role.id,
            name: role.name,
        }
    }
}

impl From<Skill> for CatalogEntry {
    fn from(skill: Skill) -> Self {
        CatalogEntry {
            id: skill.id,
            name: skill.name,
        }
    }
}
