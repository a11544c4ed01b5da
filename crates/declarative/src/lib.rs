//! # Declarative
//!
//! A framework for declarative resource management against remote APIs.
//!
//! This crate provides the core abstractions for declaring desired state,
//! recording what was created, and converging the remote system onto the
//! desired state.
//!
//! ## Core Concepts
//!
//! - **Value / Attributes**: The attribute tree of one instance. Single nested
//!   objects are one-element lists addressed as `items.0.coffee.0.id`
//! - **Schema**: Declares attributes as required, optional, or computed, and
//!   validates configuration before any remote call
//! - **StateDocument**: What a resource sees during one operation: `get`,
//!   `set`, `has_changed`, and the identity
//! - **Resource / DataSource**: Create/read/update/delete against a remote
//!   system, or read-only lookups
//! - **ExecutionPlan**: Create, update, delete, or no-op per instance address
//! - **Executor**: Runs a plan with parallelism and reports record changes
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, ExecutionPlan, execute_simple};
//!
//! // `provider` implements `Registry`, `state` maps addresses to records
//! let plan = ExecutionPlan::build(&provider, &state.resources, &desired)?;
//! let report = execute_simple(plan, &provider, &ExecuteOptions::default())?;
//! report.commit(&mut state.resources);
//! ```
//!
//! ## Callback Traits
//!
//! - [`ProgressCallback`]: Receives progress updates
//! - [`ConfirmCallback`]: Handles user confirmations
//!
//! This allows the crate to be used without hard dependencies on
//! specific UI frameworks.

pub mod context;
pub mod data;
pub mod diff;
pub mod error;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use data::{ResourceData, StateDocument};
pub use diff::{DiffSummary, ResourceDiff, compute_diffs};
pub use error::{Error, Result};
pub use executor::{ExecuteReport, Outcome, execute, execute_simple, refresh};
pub use planner::{ExecutionPlan, PlannedChange};
pub use resource::{DataSource, Registry, Resource};
pub use schema::{AttrType, Attribute, Mode, Schema};
pub use types::{
    Action, ApplyResult, ExecuteOptions, ExecuteSummary, InstanceState, LifecycleState,
    RecordChange, address, parse_address,
};
pub use value::{Attributes, Value};
