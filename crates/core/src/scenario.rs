//! Scenario constants and input validation.
//!
//! Covers scenario headers, hypothetical allocations, timeline changes and
//! resource changes. Handlers call these before any write so that invalid
//! input is rejected without touching the database.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, DbId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Scenario type tag for what-if scenarios.
pub const SCENARIO_TYPE_WHATIF: &str = "WHATIF";

/// Scenario type tag for persisted comparisons.
pub const SCENARIO_TYPE_COMPARISON: &str = "COMPARISON";

/// Maximum allowed length for a scenario name.
pub const MAX_SCENARIO_NAME_LENGTH: usize = 200;

/// Maximum allowed length for a resource name proposed by an `ADD` change.
pub const MAX_RESOURCE_NAME_LENGTH: usize = 200;

/// Utilization percentages are whole numbers in this range.
pub const MIN_UTILIZATION: i32 = 1;
pub const MAX_UTILIZATION: i32 = 100;

// ---------------------------------------------------------------------------
// Resource change type
// ---------------------------------------------------------------------------

/// Kind of hypothetical change to the resource pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceChangeType {
    /// Propose a brand-new resource.
    Add,
    /// Take an existing resource out of the scenario.
    Remove,
    /// Change rates on an existing resource.
    Modify,
}

impl ResourceChangeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "ADD",
            Self::Remove => "REMOVE",
            Self::Modify => "MODIFY",
        }
    }
}

impl fmt::Display for ResourceChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceChangeType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADD" => Ok(Self::Add),
            "REMOVE" => Ok(Self::Remove),
            "MODIFY" => Ok(Self::Modify),
            other => Err(CoreError::Validation(format!(
                "Unknown change type '{other}', expected one of ADD, REMOVE, MODIFY"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a scenario name: non-empty, trimmed, within
/// [`MAX_SCENARIO_NAME_LENGTH`].
pub fn validate_scenario_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Scenario name is required".to_string(),
        ));
    }
    if trimmed.len() != name.len() {
        return Err(CoreError::Validation(
            "Scenario name must not have leading or trailing whitespace".to_string(),
        ));
    }
    let length = name.chars().count();
    if length > MAX_SCENARIO_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Scenario name must not exceed {MAX_SCENARIO_NAME_LENGTH} characters, got {length}"
        )));
    }
    Ok(())
}

/// Require both dates and check that `end` is not before `start`.
///
/// `what` names the range in the error message (e.g. "Scenario").
pub fn require_date_range(
    what: &str,
    start: Option<Date>,
    end: Option<Date>,
) -> Result<(Date, Date), CoreError> {
    match (start, end) {
        (Some(start), Some(end)) => {
            validate_date_range(what, start, end)?;
            Ok((start, end))
        }
        _ => Err(CoreError::Validation(format!(
            "{what} start date and end date are required"
        ))),
    }
}

/// Check that `end` is not before `start`.
pub fn validate_date_range(what: &str, start: Date, end: Date) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "{what} end date {end} is before start date {start}"
        )));
    }
    Ok(())
}

/// Validate a utilization percentage.
pub fn validate_utilization(utilization: i32) -> Result<(), CoreError> {
    if !(MIN_UTILIZATION..=MAX_UTILIZATION).contains(&utilization) {
        return Err(CoreError::Validation(format!(
            "Utilization must be between {MIN_UTILIZATION} and {MAX_UTILIZATION}, got {utilization}"
        )));
    }
    Ok(())
}

/// Validate an optional non-negative amount (rates, hours).
pub fn validate_non_negative(field: &str, value: Option<f64>) -> Result<(), CoreError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(CoreError::Validation(format!(
            "{field} must be a non-negative number, got {v}"
        ))),
        _ => Ok(()),
    }
}

/// Validate the fields a resource change needs for its type.
///
/// `ADD` requires a proposed name and role. `REMOVE` and `MODIFY` require
/// the id of an existing resource; whether that resource actually exists is
/// checked by the caller against the live table.
pub fn validate_resource_change(
    change_type: ResourceChangeType,
    resource_id: Option<DbId>,
    name: Option<&str>,
    role_id: Option<DbId>,
) -> Result<(), CoreError> {
    match change_type {
        ResourceChangeType::Add => {
            let name = name.map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(CoreError::Validation(
                    "ADD changes require a resource name".to_string(),
                ));
            }
            if name.chars().count() > MAX_RESOURCE_NAME_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Resource name must not exceed {MAX_RESOURCE_NAME_LENGTH} characters"
                )));
            }
            if role_id.is_none() {
                return Err(CoreError::Validation(
                    "ADD changes require a role".to_string(),
                ));
            }
        }
        ResourceChangeType::Remove | ResourceChangeType::Modify => {
            if resource_id.is_none() {
                return Err(CoreError::Validation(format!(
                    "{change_type} changes require an existing resource_id"
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
