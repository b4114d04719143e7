//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod allocation_repo;
pub mod project_repo;
pub mod promotion_repo;
pub mod resource_change_repo;
pub mod resource_repo;
pub mod role_repo;
pub mod scenario_allocation_repo;
pub mod scenario_repo;
pub mod skill_repo;
pub mod timeline_change_repo;

pub use allocation_repo::AllocationRepo;
pub use project_repo::ProjectRepo;
pub use promotion_repo::{PromoteError, PromotionRepo};
pub use resource_change_repo::ResourceChangeRepo;
pub use resource_repo::ResourceRepo;
pub use role_repo::RoleRepo;
pub use scenario_allocation_repo::ScenarioAllocationRepo;
pub use scenario_repo::ScenarioRepo;
pub use skill_repo::SkillRepo;
pub use timeline_change_repo::TimelineChangeRepo;
