//! Typed references into the `skills` and `roles` catalogs.
//!
//! Allocations and resource changes carry lists of required skills/roles.
//! Each element is either already resolved to a catalog id or a bare name
//! that is matched case-insensitively against the catalog when needed.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum number of references accepted in a single list.
pub const MAX_REFS_PER_LIST: usize = 100;

// ---------------------------------------------------------------------------
// Reference type
// ---------------------------------------------------------------------------

/// A single skill or role reference as stored in a JSONB array.
///
/// Serialized untagged, so `{"id": 3, "name": "Rust"}` and `"Rust"` are both
/// accepted on input and round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogRef {
    Id {
        id: DbId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Name(String),
}

impl CatalogRef {
    /// Display name carried by the reference itself, if any.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Id { name, .. } => name.as_deref(),
            Self::Name(name) => Some(name.as_str()),
        }
    }
}

/// Validate a list of references before it is persisted.
pub fn validate_refs(field: &str, refs: &[CatalogRef]) -> Result<(), CoreError> {
    if refs.len() > MAX_REFS_PER_LIST {
        return Err(CoreError::Validation(format!(
            "{field} must not contain more than {MAX_REFS_PER_LIST} entries, got {}",
            refs.len()
        )));
    }
    for r in refs {
        match r {
            CatalogRef::Id { id, .. } if *id <= 0 => {
                return Err(CoreError::Validation(format!(
                    "{field} contains an invalid id: {id}"
                )));
            }
            CatalogRef::Name(name) if name.trim().is_empty() => {
                return Err(CoreError::Validation(format!(
                    "{field} contains an empty name"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog lookup
// ---------------------------------------------------------------------------

/// A row of a catalog table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: DbId,
    pub name: String,
}

/// In-memory index over a catalog table, keyed by id and lowercase name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    by_id: BTreeMap<DbId, String>,
    by_name: HashMap<String, DbId>,
}

impl Catalog {
    pub fn new(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        let mut catalog = Self::default();
        for entry in entries {
            catalog
                .by_name
                .entry(entry.name.trim().to_lowercase())
                .or_insert(entry.id);
            catalog.by_id.insert(entry.id, entry.name);
        }
        catalog
    }

    /// Resolve a reference to a catalog id.
    ///
    /// Id references resolve to their id even when the catalog does not
    /// contain it. Name references resolve only on a case-insensitive match.
    pub fn resolve(&self, r: &CatalogRef) -> Option<DbId> {
        match r {
            CatalogRef::Id { id, .. } => Some(*id),
            CatalogRef::Name(name) => self.by_name.get(&name.trim().to_lowercase()).copied(),
        }
    }

    pub fn name_of(&self, id: DbId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// All catalog ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = DbId> + '_ {
        self.by_id.keys().copied()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn skills() -> Catalog {
        Catalog::new([
            CatalogEntry {
                id: 1,
                name: "Rust".to_string(),
            },
            CatalogEntry {
                id: 2,
                name: "Project Management".to_string(),
            },
        ])
    }

    #[test]
    fn deserializes_object_and_bare_name() {
        let refs: Vec<CatalogRef> =
            serde_json::from_value(json!([{"id": 4, "name": "SQL"}, {"id": 5}, "rust"])).unwrap();
        assert_eq!(
            refs,
            vec![
                CatalogRef::Id {
                    id: 4,
                    name: Some("SQL".to_string())
                },
                CatalogRef::Id { id: 5, name: None },
                CatalogRef::Name("rust".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_malformed_entries() {
        let parsed: Result<Vec<CatalogRef>, _> = serde_json::from_value(json!([42]));
        assert!(parsed.is_err());
    }

    #[test]
    fn resolves_names_case_insensitively() {
        let catalog = skills();
        assert_eq!(catalog.resolve(&CatalogRef::Name("RUST".into())), Some(1));
        assert_eq!(
            catalog.resolve(&CatalogRef::Name(" project management ".into())),
            Some(2)
        );
        assert_eq!(catalog.resolve(&CatalogRef::Name("Cobol".into())), None);
    }

    #[test]
    fn id_refs_resolve_without_catalog_match() {
        let catalog = skills();
        assert_eq!(
            catalog.resolve(&CatalogRef::Id { id: 99, name: None }),
            Some(99)
        );
    }

    #[test]
    fn validate_refs_rejects_empty_names_and_bad_ids() {
        assert!(validate_refs("skills", &[CatalogRef::Name("  ".into())]).is_err());
        assert!(validate_refs("skills", &[CatalogRef::Id { id: 0, name: None }]).is_err());
        assert!(validate_refs("skills", &[CatalogRef::Name("Rust".into())]).is_ok());
    }
}
