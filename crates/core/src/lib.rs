//! Domain logic for ResourcePulse what-if scenarios.
//!
//! Nothing in this crate touches the database: repositories in
//! `resourcepulse-db` load rows, map them into the plain input types defined
//! here, and persist whatever these functions return.

pub mod catalog;
pub mod comparison;
pub mod error;
pub mod metrics;
pub mod promotion;
pub mod scenario;
pub mod types;
