//! What-if scenario metrics calculator.
//!
//! Turns a scenario's hypothetical allocations, timeline changes and
//! resource changes into a single metrics document: utilization per
//! resource, cost/billable/margin per project and overall, skills coverage,
//! and the list of proposed project date shifts.
//!
//! The calculation is a pure function of its input. Callers load the rows,
//! call [`calculate_metrics`], and store the result on the scenario; there is
//! no incremental path, every call recomputes from scratch.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogRef};
use crate::scenario::ResourceChangeType;
use crate::types::{Date, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Working days in a calendar week, used for the five-day-week approximation.
pub const WORKDAYS_PER_WEEK: f64 = 5.0;
/// Calendar days in a week.
pub const DAYS_PER_WEEK: f64 = 7.0;
/// Billable hours in one working day at 100% utilization.
pub const HOURS_PER_WORKDAY: f64 = 8.0;
/// Every allocation counts for at least one working day.
pub const MIN_WORKDAYS: i64 = 1;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// A hypothetical allocation of a resource to a project.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationFacts {
    pub resource_id: DbId,
    pub project_id: DbId,
    pub start_date: Date,
    pub end_date: Date,
    /// Percentage of the resource's time, normally 1..=100.
    pub utilization: i32,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
    /// When present, replaces the computed hours entirely.
    pub total_hours: Option<f64>,
    pub required_skills: Vec<CatalogRef>,
}

/// The live resource row an allocation refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceFacts {
    pub id: DbId,
    pub name: String,
    pub role_id: Option<DbId>,
    pub hourly_rate: Option<f64>,
    pub billable_rate: Option<f64>,
}

/// The live project row an allocation or timeline change refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFacts {
    pub id: DbId,
    pub name: String,
}

/// A proposed change to a project's schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineFacts {
    pub project_id: DbId,
    pub original_start_date: Option<Date>,
    pub original_end_date: Option<Date>,
    pub new_start_date: Date,
    pub new_end_date: Date,
}

/// A proposed change to the resource pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceChangeFacts {
    pub change_type: ResourceChangeType,
    pub resource_id: Option<DbId>,
    pub skills: Vec<CatalogRef>,
}

/// Everything the calculator reads for one scenario.
#[derive(Debug, Clone, Default)]
pub struct MetricsInput {
    pub allocations: Vec<AllocationFacts>,
    pub timeline_changes: Vec<TimelineFacts>,
    pub resource_changes: Vec<ResourceChangeFacts>,
    pub resources: Vec<ResourceFacts>,
    pub projects: Vec<ProjectFacts>,
    pub skills: Catalog,
    pub roles: Catalog,
}

// ---------------------------------------------------------------------------
// Output document
// ---------------------------------------------------------------------------

/// The computed metrics document stored in `scenarios.metrics_data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub utilization: UtilizationMetrics,
    pub costs: CostMetrics,
    pub skills: SkillsCoverage,
    pub timeline: Vec<TimelineShift>,
    pub calculated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationMetrics {
    pub by_resource: BTreeMap<DbId, ResourceUtilization>,
    /// Mean of `total_utilization` across resources; 0 with no allocations.
    pub overall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUtilization {
    pub resource_id: DbId,
    pub resource_name: Option<String>,
    pub role_name: Option<String>,
    /// Sum of utilization over all of the resource's allocations. Values
    /// above 100 are reported as-is.
    pub total_utilization: f64,
    pub projects: Vec<ProjectUtilization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectUtilization {
    pub project_id: DbId,
    pub utilization: i32,
    pub start_date: Date,
    pub end_date: Date,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostMetrics {
    pub total_cost: f64,
    pub total_billable: f64,
    pub total_hours: f64,
    pub margin: f64,
    pub by_project: BTreeMap<DbId, ProjectCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectCost {
    pub project_id: DbId,
    pub project_name: Option<String>,
    pub cost: f64,
    pub billable: f64,
    pub hours: f64,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsCoverage {
    pub required: Vec<SkillSummary>,
    pub covered: Vec<SkillSummary>,
    pub missing: Vec<SkillSummary>,
    pub coverage_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSummary {
    pub id: DbId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineShift {
    pub project_id: DbId,
    pub project_name: Option<String>,
    pub original_start_date: Option<Date>,
    pub original_end_date: Option<Date>,
    pub new_start_date: Date,
    pub new_end_date: Date,
    pub start_shift_days: Option<i64>,
    pub end_shift_days: Option<i64>,
}

// ---------------------------------------------------------------------------
// Arithmetic helpers
// ---------------------------------------------------------------------------

/// Working days between two dates using a five-day-week approximation.
///
/// `round(calendar_days * 5 / 7)`, never less than [`MIN_WORKDAYS`].
pub fn workdays_between(start: Date, end: Date) -> i64 {
    let days = (end - start).num_days() as f64;
    let workdays = (days * WORKDAYS_PER_WEEK / DAYS_PER_WEEK).round() as i64;
    workdays.max(MIN_WORKDAYS)
}

/// Hours booked by an allocation: the explicit override when present,
/// otherwise `workdays * 8 * utilization / 100`.
pub fn allocation_hours(allocation: &AllocationFacts) -> f64 {
    allocation.total_hours.unwrap_or_else(|| {
        let workdays = workdays_between(allocation.start_date, allocation.end_date);
        workdays as f64 * HOURS_PER_WORKDAY * (f64::from(allocation.utilization) / 100.0)
    })
}

/// Margin as a percentage of cost. Zero when cost is zero.
pub fn margin_percentage(cost: f64, billable: f64) -> f64 {
    if cost > 0.0 {
        (billable - cost) / cost * 100.0
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Compute the full metrics document for one scenario.
pub fn calculate_metrics(input: &MetricsInput, calculated_at: Timestamp) -> ScenarioMetrics {
    let resources: BTreeMap<DbId, &ResourceFacts> =
        input.resources.iter().map(|r| (r.id, r)).collect();
    let projects: BTreeMap<DbId, &ProjectFacts> =
        input.projects.iter().map(|p| (p.id, p)).collect();

    ScenarioMetrics {
        utilization: utilization(input, &resources),
        costs: costs(input, &resources, &projects),
        skills: skills_coverage(input),
        timeline: timeline_shifts(input, &projects),
        calculated_at,
    }
}

fn utilization(
    input: &MetricsInput,
    resources: &BTreeMap<DbId, &ResourceFacts>,
) -> UtilizationMetrics {
    let mut by_resource: BTreeMap<DbId, ResourceUtilization> = BTreeMap::new();

    for a in &input.allocations {
        let entry = by_resource.entry(a.resource_id).or_insert_with(|| {
            let resource = resources.get(&a.resource_id);
            ResourceUtilization {
                resource_id: a.resource_id,
                resource_name: resource.map(|r| r.name.clone()),
                role_name: resource
                    .and_then(|r| r.role_id)
                    .and_then(|id| input.roles.name_of(id))
                    .map(str::to_string),
                total_utilization: 0.0,
                projects: Vec::new(),
            }
        });
        entry.total_utilization += f64::from(a.utilization);
        entry.projects.push(ProjectUtilization {
            project_id: a.project_id,
            utilization: a.utilization,
            start_date: a.start_date,
            end_date: a.end_date,
        });
    }

    for entry in by_resource.values_mut() {
        entry
            .projects
            .sort_by_key(|p| (p.project_id, p.start_date, p.end_date));
    }

    let overall = if by_resource.is_empty() {
        0.0
    } else {
        let sum: f64 = by_resource.values().map(|r| r.total_utilization).sum();
        sum / by_resource.len() as f64
    };

    UtilizationMetrics {
        by_resource,
        overall,
    }
}

fn costs(
    input: &MetricsInput,
    resources: &BTreeMap<DbId, &ResourceFacts>,
    projects: &BTreeMap<DbId, &ProjectFacts>,
) -> CostMetrics {
    let mut by_project: BTreeMap<DbId, ProjectCost> = BTreeMap::new();
    let mut total_cost = 0.0;
    let mut total_billable = 0.0;
    let mut total_hours = 0.0;

    for a in &input.allocations {
        let resource = resources.get(&a.resource_id);
        let hourly_rate = a
            .hourly_rate
            .or_else(|| resource.and_then(|r| r.hourly_rate))
            .unwrap_or(0.0);
        let billable_rate = a
            .billable_rate
            .or_else(|| resource.and_then(|r| r.billable_rate))
            .unwrap_or(0.0);

        let hours = allocation_hours(a);
        let cost = hourly_rate * hours;
        let billable = billable_rate * hours;

        let entry = by_project.entry(a.project_id).or_insert_with(|| ProjectCost {
            project_id: a.project_id,
            project_name: projects.get(&a.project_id).map(|p| p.name.clone()),
            cost: 0.0,
            billable: 0.0,
            hours: 0.0,
            margin: 0.0,
        });
        entry.cost += cost;
        entry.billable += billable;
        entry.hours += hours;

        total_cost += cost;
        total_billable += billable;
        total_hours += hours;
    }

    for entry in by_project.values_mut() {
        entry.margin = margin_percentage(entry.cost, entry.billable);
    }

    CostMetrics {
        total_cost,
        total_billable,
        total_hours,
        margin: margin_percentage(total_cost, total_billable),
        by_project,
    }
}

/// Skills coverage across the scenario.
///
/// Required skills are the union of every allocation's `required_skills`.
/// Available skills come from two sources: every resource that still has an
/// allocation after `REMOVE` changes is treated as covering the whole skills
/// catalog (no per-skill proficiency matching), and `ADD` changes contribute
/// the skills they list.
fn skills_coverage(input: &MetricsInput) -> SkillsCoverage {
    let mut labels: BTreeMap<DbId, String> = BTreeMap::new();
    let mut required: BTreeSet<DbId> = BTreeSet::new();

    for a in &input.allocations {
        for r in &a.required_skills {
            if let Some(id) = input.skills.resolve(r) {
                required.insert(id);
                if let Some(label) = r.label() {
                    labels.entry(id).or_insert_with(|| label.to_string());
                }
            }
        }
    }

    let removed: BTreeSet<DbId> = input
        .resource_changes
        .iter()
        .filter(|c| c.change_type == ResourceChangeType::Remove)
        .filter_map(|c| c.resource_id)
        .collect();

    let mut available: BTreeSet<DbId> = BTreeSet::new();
    let has_retained_resource = input
        .allocations
        .iter()
        .any(|a| !removed.contains(&a.resource_id));
    if has_retained_resource {
        available.extend(input.skills.ids());
    }
    for change in input
        .resource_changes
        .iter()
        .filter(|c| c.change_type == ResourceChangeType::Add)
    {
        available.extend(change.skills.iter().filter_map(|r| input.skills.resolve(r)));
    }

    let summary = |id: DbId| SkillSummary {
        id,
        name: input
            .skills
            .name_of(id)
            .map(str::to_string)
            .or_else(|| labels.get(&id).cloned())
            .unwrap_or_else(|| format!("Skill {id}")),
    };

    let (covered, missing): (Vec<DbId>, Vec<DbId>) =
        required.iter().copied().partition(|id| available.contains(id));

    let coverage_percentage = if required.is_empty() {
        100.0
    } else {
        covered.len() as f64 / required.len() as f64 * 100.0
    };

    SkillsCoverage {
        required: required.iter().copied().map(&summary).collect(),
        covered: covered.into_iter().map(&summary).collect(),
        missing: missing.into_iter().map(&summary).collect(),
        coverage_percentage,
    }
}

fn timeline_shifts(
    input: &MetricsInput,
    projects: &BTreeMap<DbId, &ProjectFacts>,
) -> Vec<TimelineShift> {
    let mut shifts: Vec<TimelineShift> = input
        .timeline_changes
        .iter()
        .map(|t| TimelineShift {
            project_id: t.project_id,
            project_name: projects.get(&t.project_id).map(|p| p.name.clone()),
            original_start_date: t.original_start_date,
            original_end_date: t.original_end_date,
            new_start_date: t.new_start_date,
            new_end_date: t.new_end_date,
            start_shift_days: t
                .original_start_date
                .map(|orig| (t.new_start_date - orig).num_days()),
            end_shift_days: t
                .original_end_date
                .map(|orig| (t.new_end_date - orig).num_days()),
        })
        .collect();
    shifts.sort_by_key(|s| s.project_id);
    shifts
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
