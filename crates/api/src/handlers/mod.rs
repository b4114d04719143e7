pub mod allocation;
pub mod comparison;
pub mod metrics;
pub mod promotion;
pub mod resource_change;
pub mod scenario;
pub mod timeline;
