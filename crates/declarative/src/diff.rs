//! Diff computation for planned changes

use crate::planner::{ExecutionPlan, PlannedChange};
use crate::types::Action;
use crate::value::Attributes;
use serde::{Deserialize, Serialize};

/// Before/after view of one planned change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDiff {
    /// Instance address
    pub address: String,
    /// Type of the resource
    pub type_name: String,
    pub action: Action,
    /// Recorded attributes
    pub before: Option<Attributes>,
    /// Planned attributes
    pub after: Option<Attributes>,
    /// Top-level attributes that differ
    pub changed: Vec<String>,
}

impl ResourceDiff {
    /// Create a diff from a planned change, returning None if nothing changes
    pub fn from_change(change: &PlannedChange) -> Option<Self> {
        if !change.action.is_change() {
            return None;
        }

        let before = change.prior.as_ref().map(|p| p.attributes.clone());
        let after = match change.action {
            Action::Delete => None,
            _ => Some(change.data.planned().clone()),
        };

        Some(Self {
            address: change.address.clone(),
            type_name: change.type_name.clone(),
            action: change.action,
            before,
            after,
            changed: change.changed_attributes(),
        })
    }

    /// Check if this diff represents an addition
    pub fn is_addition(&self) -> bool {
        self.action == Action::Create
    }

    /// Check if this diff represents a removal
    pub fn is_removal(&self) -> bool {
        self.action == Action::Delete
    }

    /// Check if this diff represents a modification
    pub fn is_modification(&self) -> bool {
        self.action == Action::Update
    }
}

/// Compute diffs for a plan
///
/// Returns only changes that will actually run.
pub fn compute_diffs(plan: &ExecutionPlan) -> Vec<ResourceDiff> {
    plan.changes
        .iter()
        .filter_map(ResourceDiff::from_change)
        .collect()
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    /// Number of instances to add
    pub additions: usize,
    /// Number of instances to remove
    pub removals: usize,
    /// Number of instances to modify
    pub modifications: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            if diff.is_addition() {
                summary.additions += 1;
            } else if diff.is_removal() {
                summary.removals += 1;
            } else if diff.is_modification() {
                summary.modifications += 1;
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.additions + self.removals + self.modifications
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}
