//! Side-by-side comparison of scenarios' stored metrics documents.
//!
//! A comparison never recalculates anything: each scenario must already
//! carry a metrics document, and the comparison copies the requested slices
//! of those documents into parallel per-metric arrays.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metrics::{ProjectCost, ResourceUtilization, ScenarioMetrics, SkillSummary};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Minimum number of scenarios in a comparison.
pub const MIN_COMPARISON_SCENARIOS: usize = 2;

/// Id reported for comparisons that were not persisted.
pub const EPHEMERAL_COMPARISON_ID: DbId = -1;

// ---------------------------------------------------------------------------
// Metric selector
// ---------------------------------------------------------------------------

/// A section of the metrics document that can be compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMetric {
    Utilization,
    Costs,
    Skills,
}

impl ComparisonMetric {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utilization => "utilization",
            Self::Costs => "costs",
            Self::Skills => "skills",
        }
    }
}

impl fmt::Display for ComparisonMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComparisonMetric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utilization" => Ok(Self::Utilization),
            "costs" => Ok(Self::Costs),
            "skills" => Ok(Self::Skills),
            other => Err(CoreError::Validation(format!(
                "Unknown comparison metric '{other}', expected utilization, costs or skills"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Request validation
// ---------------------------------------------------------------------------

/// Validate the scenario ids and metric names of a comparison request.
///
/// Returns the parsed metrics, de-duplicated in request order.
pub fn validate_comparison_request(
    scenario_ids: &[DbId],
    metrics: &[String],
) -> Result<Vec<ComparisonMetric>, CoreError> {
    if scenario_ids.len() < MIN_COMPARISON_SCENARIOS {
        return Err(CoreError::Validation(format!(
            "At least {MIN_COMPARISON_SCENARIOS} scenario ids are required for comparison"
        )));
    }
    let mut seen = scenario_ids.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != scenario_ids.len() {
        return Err(CoreError::Validation(
            "Scenario ids must be unique".to_string(),
        ));
    }

    if metrics.is_empty() {
        return Err(CoreError::Validation(
            "At least one metric to compare is required".to_string(),
        ));
    }
    let mut parsed: Vec<ComparisonMetric> = Vec::with_capacity(metrics.len());
    for m in metrics {
        let metric: ComparisonMetric = m.parse()?;
        if !parsed.contains(&metric) {
            parsed.push(metric);
        }
    }
    Ok(parsed)
}

// ---------------------------------------------------------------------------
// Comparison document
// ---------------------------------------------------------------------------

/// A scenario as loaded for comparison.
#[derive(Debug, Clone)]
pub struct ScenarioSnapshot {
    pub scenario_id: DbId,
    pub name: String,
    pub metrics: Option<ScenarioMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparedScenario {
    pub scenario_id: DbId,
    pub name: String,
    pub calculated_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilizationEntry {
    pub scenario_id: DbId,
    pub scenario_name: String,
    pub overall: f64,
    pub by_resource: BTreeMap<DbId, ResourceUtilization>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostsEntry {
    pub scenario_id: DbId,
    pub scenario_name: String,
    pub total_cost: f64,
    pub total_billable: f64,
    pub margin: f64,
    pub by_project: BTreeMap<DbId, ProjectCost>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillsEntry {
    pub scenario_id: DbId,
    pub scenario_name: String,
    pub coverage_percentage: f64,
    pub covered: Vec<SkillSummary>,
    pub missing: Vec<SkillSummary>,
}

/// The comparison document stored in `scenarios.comparison_data` on a
/// `COMPARISON` scenario row.
///
/// Each requested metric is a parallel array with one entry per scenario,
/// in the order the scenarios were requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonData {
    pub metrics: Vec<ComparisonMetric>,
    pub scenarios: Vec<ComparedScenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<Vec<UtilizationEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub costs: Option<Vec<CostsEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<SkillsEntry>>,
}

/// Assemble a comparison from scenarios that already have metrics.
///
/// Fails without producing anything if any scenario lacks a metrics
/// document; the caller has to calculate metrics first.
pub fn build_comparison(
    snapshots: &[ScenarioSnapshot],
    metrics: &[ComparisonMetric],
) -> Result<ComparisonData, CoreError> {
    let mut calculated: Vec<(&ScenarioSnapshot, &ScenarioMetrics)> =
        Vec::with_capacity(snapshots.len());
    for s in snapshots {
        let m = s.metrics.as_ref().ok_or_else(|| {
            CoreError::Validation(format!(
                "Scenario {} has no calculated metrics; calculate metrics before comparing",
                s.scenario_id
            ))
        })?;
        calculated.push((s, m));
    }

    let wants = |metric: ComparisonMetric| metrics.contains(&metric);

    Ok(ComparisonData {
        metrics: metrics.to_vec(),
        scenarios: calculated
            .iter()
            .map(|(s, m)| ComparedScenario {
                scenario_id: s.scenario_id,
                name: s.name.clone(),
                calculated_at: m.calculated_at,
            })
            .collect(),
        utilization: wants(ComparisonMetric::Utilization).then(|| {
            calculated
                .iter()
                .map(|(s, m)| UtilizationEntry {
                    scenario_id: s.scenario_id,
                    scenario_name: s.name.clone(),
                    overall: m.utilization.overall,
                    by_resource: m.utilization.by_resource.clone(),
                })
                .collect()
        }),
        costs: wants(ComparisonMetric::Costs).then(|| {
            calculated
                .iter()
                .map(|(s, m)| CostsEntry {
                    scenario_id: s.scenario_id,
                    scenario_name: s.name.clone(),
                    total_cost: m.costs.total_cost,
                    total_billable: m.costs.total_billable,
                    margin: m.costs.margin,
                    by_project: m.costs.by_project.clone(),
                })
                .collect()
        }),
        skills: wants(ComparisonMetric::Skills).then(|| {
            calculated
                .iter()
                .map(|(s, m)| SkillsEntry {
                    scenario_id: s.scenario_id,
                    scenario_name: s.name.clone(),
                    coverage_percentage: m.skills.coverage_percentage,
                    covered: m.skills.covered.clone(),
                    missing: m.skills.missing.clone(),
                })
                .collect()
        }),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
