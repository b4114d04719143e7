//! Planning for scenario promotion.
//!
//! Promotion copies a scenario's hypothetical changes into the live tables.
//! The database layer runs the writes inside one transaction; this module
//! decides what each recorded change turns into so the rules can be tested
//! without a database.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::scenario::ResourceChangeType;
use crate::types::DbId;

/// What promotion does with one resource change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceAction {
    /// Insert a new live resource from the proposed fields.
    Create,
    /// Merge non-null rate overrides onto the existing live resource.
    MergeRates { resource_id: DbId },
    /// Leave the live resource in place but skip its allocations.
    Exclude { resource_id: DbId },
    /// Nothing to apply (e.g. an `ADD` that already names a resource).
    Ignore,
}

/// Decide the action for a single resource change.
pub fn resource_action(change_type: ResourceChangeType, resource_id: Option<DbId>) -> ResourceAction {
    match (change_type, resource_id) {
        (ResourceChangeType::Add, None) => ResourceAction::Create,
        (ResourceChangeType::Add, Some(_)) => ResourceAction::Ignore,
        (ResourceChangeType::Modify, Some(resource_id)) => ResourceAction::MergeRates { resource_id },
        (ResourceChangeType::Remove, Some(resource_id)) => ResourceAction::Exclude { resource_id },
        (ResourceChangeType::Modify | ResourceChangeType::Remove, None) => ResourceAction::Ignore,
    }
}

/// Resources marked `REMOVE` within a scenario.
pub fn removed_resources<I>(changes: I) -> BTreeSet<DbId>
where
    I: IntoIterator<Item = (ResourceChangeType, Option<DbId>)>,
{
    changes
        .into_iter()
        .filter_map(|(change_type, resource_id)| match resource_action(change_type, resource_id) {
            ResourceAction::Exclude { resource_id } => Some(resource_id),
            _ => None,
        })
        .collect()
}

/// Split allocations into those to apply and those dropped because their
/// resource is marked `REMOVE`. Order within each side is preserved.
pub fn partition_allocations<T, F>(
    allocations: Vec<T>,
    removed: &BTreeSet<DbId>,
    resource_of: F,
) -> (Vec<T>, Vec<T>)
where
    F: Fn(&T) -> DbId,
{
    allocations
        .into_iter()
        .partition(|a| !removed.contains(&resource_of(a)))
}

/// Counts reported back to the caller after a successful promotion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionSummary {
    pub scenario_id: DbId,
    pub timeline_updates: u64,
    pub resources_created: u64,
    pub resources_modified: u64,
    pub resources_excluded: u64,
    pub allocations_inserted: u64,
    pub allocations_updated: u64,
    pub allocations_skipped: u64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_without_resource_creates() {
        assert_eq!(resource_action(ResourceChangeType::Add, None), ResourceAction::Create);
        assert_eq!(resource_action(ResourceChangeType::Add, Some(3)), ResourceAction::Ignore);
    }

    #[test]
    fn modify_merges_and_remove_excludes() {
        assert_eq!(
            resource_action(ResourceChangeType::Modify, Some(3)),
            ResourceAction::MergeRates { resource_id: 3 }
        );
        assert_eq!(
            resource_action(ResourceChangeType::Remove, Some(4)),
            ResourceAction::Exclude { resource_id: 4 }
        );
        assert_eq!(resource_action(ResourceChangeType::Remove, None), ResourceAction::Ignore);
    }

    #[test]
    fn removed_resources_collects_only_remove_changes() {
        let removed = removed_resources([
            (ResourceChangeType::Remove, Some(2)),
            (ResourceChangeType::Modify, Some(3)),
            (ResourceChangeType::Add, None),
            (ResourceChangeType::Remove, Some(5)),
        ]);
        assert_eq!(removed.into_iter().collect::<Vec<_>>(), vec![2, 5]);
    }

    #[test]
    fn allocations_of_removed_resources_are_skipped() {
        let removed: BTreeSet<DbId> = [2].into_iter().collect();
        let allocations = vec![(1, 10), (2, 10), (3, 11), (2, 12)];

        let (apply, skipped) = partition_allocations(allocations, &removed, |a| a.0);

        assert_eq!(apply, vec![(1, 10), (3, 11)]);
        assert_eq!(skipped, vec![(2, 10), (2, 12)]);
    }
}
