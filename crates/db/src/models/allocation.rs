//! Live allocation model.
//!
//! Live allocations are only written by scenario promotion; the struct below
//! doubles as the write payload for both insert and update.

use resourcepulse_core::types::{Date, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `allocations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Allocation {
    pub id: DbId,
    pub resource_id: DbId,
    pub project_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub utilization: i32,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub total_hours: Option<f64>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Values written to a live allocation.
#[derive(Debug, Clone)]
pub struct AllocationValues {
    pub resource_id: DbId,
    pub project_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    pub utilization: i32,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    pub total_hours: Option<f64>,
    pub notes: Option<String>,
}
