//! Core types for declarative resource management

use crate::value::Attributes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recorded state of one managed instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceState {
    /// Resource type (e.g. "hashicups_order")
    #[serde(rename = "type")]
    pub type_name: String,
    /// Remote identity
    pub id: String,
    /// Flat attribute tree
    #[serde(default)]
    pub attributes: Attributes,
}

/// Build an instance address from its type and local name
pub fn address(type_name: &str, name: &str) -> String {
    format!("{}.{}", type_name, name)
}

/// Split an address into (type, name)
pub fn parse_address(address: &str) -> Option<(&str, &str)> {
    address
        .split_once('.')
        .filter(|(t, n)| !t.is_empty() && !n.is_empty())
}

/// Lifecycle of a managed instance
///
/// `Absent → Created → Synced → (Updating → Synced)* → Deleted`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// No identity assigned
    Absent,
    /// Identity assigned, computed attributes not yet read
    Created,
    /// Recorded state matches the last read
    Synced,
    /// Replacement sent, refresh pending
    Updating,
    /// Local record removed
    Deleted,
}

impl LifecycleState {
    /// Whether moving to `next` is a legal transition
    pub fn can_transition(self, next: LifecycleState) -> bool {
        use LifecycleState::*;
        matches!(
            (self, next),
            (Absent, Created)
                | (Created, Synced)
                | (Synced, Synced)
                | (Synced, Updating)
                | (Updating, Synced)
                | (_, Deleted)
        )
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Absent => "absent",
            Self::Created => "created",
            Self::Synced => "synced",
            Self::Updating => "updating",
            Self::Deleted => "deleted",
        };
        write!(f, "{}", s)
    }
}

/// Operation planned for an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Create,
    Update,
    Delete,
    NoOp,
}

impl Action {
    /// Plan symbol (`+`, `~`, `-`, blank)
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Create => "+",
            Self::Update => "~",
            Self::Delete => "-",
            Self::NoOp => " ",
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "destroy",
            Self::NoOp => "no-op",
        };
        write!(f, "{}", s)
    }
}

/// Result of applying one instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Instance was created
    Created,
    /// Instance was modified
    Modified,
    /// Instance was removed
    Removed,
    /// Apply failed
    Failed { error: String },
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents success (no failure)
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }

    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}

/// What to do with the recorded instance after an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordChange {
    /// Leave the previous record (or its absence) as it was
    Keep,
    /// Replace the record
    Write(InstanceState),
    /// Drop the record
    Remove,
}

/// Summary of execution results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Check if execution was fully successful (no failures)
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }

    /// Total number of instances processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.removed + self.skipped + self.failed + self.no_change
    }

    /// Add a result to the summary
    pub fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Failed { .. } => self.failed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Options for execution
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Number of instances processed in parallel
    pub jobs: usize,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            jobs: 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_round_trip() {
        let addr = address("hashicups_order", "edu");
        assert_eq!(addr, "hashicups_order.edu");
        assert_eq!(parse_address(&addr), Some(("hashicups_order", "edu")));
        assert_eq!(parse_address("noseparator"), None);
        assert_eq!(parse_address(".name"), None);
    }

    #[test]
    fn test_lifecycle_transitions() {
        use LifecycleState::*;
        assert!(Absent.can_transition(Created));
        assert!(Created.can_transition(Synced));
        assert!(Synced.can_transition(Updating));
        assert!(Updating.can_transition(Synced));
        assert!(Absent.can_transition(Deleted));
        assert!(!Absent.can_transition(Synced));
        assert!(!Deleted.can_transition(Created));
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = ExecuteSummary::default();
        summary.add_result(&ApplyResult::Created);
        summary.add_result(&ApplyResult::NoChange);
        summary.add_result(&ApplyResult::Failed {
            error: "boom".into(),
        });

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.total_changes(), 1);
        assert!(!summary.is_success());
    }

    #[test]
    fn test_instance_state_serde() {
        let json = r#"{"type":"hashicups_order","id":"4","attributes":{"last_updated":"x"}}"#;
        let state: InstanceState = serde_json::from_str(json).unwrap();
        assert_eq!(state.type_name, "hashicups_order");
        assert_eq!(state.id, "4");
    }
}
