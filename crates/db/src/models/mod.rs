//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

pub mod allocation;
pub mod catalog;
pub mod project;
pub mod resource;
pub mod resource_change;
pub mod scenario;
pub mod scenario_allocation;
pub mod timeline_change;
