//! Execution engine - runs planned changes with parallelism

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::error::{Error, Result};
use crate::planner::{ExecutionPlan, PlannedChange};
use crate::data::ResourceData;
use crate::resource::{Registry, Resource};
use crate::types::{
    Action, ApplyResult, ExecuteOptions, ExecuteSummary, InstanceState, LifecycleState,
    RecordChange,
};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Result of running one instance
#[derive(Debug, Clone)]
pub struct Outcome {
    pub address: String,
    pub action: Action,
    pub result: ApplyResult,
    /// How the recorded state changes
    pub record: RecordChange,
    /// Lifecycle state the instance ended in
    pub lifecycle: LifecycleState,
}

impl Outcome {
    /// Apply the record change to a set of recorded instances
    pub fn commit(&self, records: &mut BTreeMap<String, InstanceState>) {
        match &self.record {
            RecordChange::Keep => {}
            RecordChange::Write(state) => {
                records.insert(self.address.clone(), state.clone());
            }
            RecordChange::Remove => {
                records.remove(&self.address);
            }
        }
    }
}

/// Outcomes of an execution, in address order
#[derive(Debug, Clone, Default)]
pub struct ExecuteReport {
    pub summary: ExecuteSummary,
    pub outcomes: Vec<Outcome>,
}

impl ExecuteReport {
    /// Apply every record change to a set of recorded instances
    pub fn commit(&self, records: &mut BTreeMap<String, InstanceState>) {
        for outcome in &self.outcomes {
            outcome.commit(records);
        }
    }

    fn from_outcomes(outcomes: Vec<Outcome>, no_change: usize) -> Self {
        let mut summary = ExecuteSummary {
            no_change,
            ..Default::default()
        };
        for outcome in &outcomes {
            summary.add_result(&outcome.result);
        }
        Self { summary, outcomes }
    }
}

/// Execute a plan with the given options and callbacks
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `registry` - Resolves resource implementations by type
/// * `opts` - Execution options (dry_run, jobs)
/// * `progress` - Progress callback
/// * `confirm` - Confirmation callback
///
/// Failed instances keep their previous record; the rest of the plan still
/// runs.
pub fn execute<P, C>(
    plan: ExecutionPlan,
    registry: &dyn Registry,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteReport>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let total_changes = plan.total_changes();
    let no_change = plan.changes.len() - total_changes;

    if total_changes == 0 {
        return Ok(ExecuteReport::from_outcomes(Vec::new(), no_change));
    }

    if opts.dry_run || !confirm.confirm("Apply changes?")? {
        let mut report = ExecuteReport::from_outcomes(Vec::new(), no_change);
        report.summary.skipped = total_changes;
        return Ok(report);
    }

    let pending: Vec<PlannedChange> = plan
        .changes
        .into_iter()
        .filter(|c| c.action.is_change())
        .collect();

    progress.on_batch_start(pending.len());
    let outcomes = run_batch(pending, opts.jobs, progress, |change| {
        apply_change(registry, change)
    })?;
    progress.on_batch_complete();

    Ok(ExecuteReport::from_outcomes(outcomes, no_change))
}

/// Simple execution without callbacks
pub fn execute_simple(
    plan: ExecutionPlan,
    registry: &dyn Registry,
    opts: &ExecuteOptions,
) -> Result<ExecuteReport> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(plan, registry, opts, &mut NoProgress, &mut AutoConfirm)
}

/// Read every recorded instance from the remote system
///
/// Instances whose remote object is gone are dropped; read failures keep
/// the previous record.
pub fn refresh<P: ProgressCallback>(
    registry: &dyn Registry,
    records: &BTreeMap<String, InstanceState>,
    jobs: usize,
    progress: &mut P,
) -> Result<ExecuteReport> {
    let reads = records
        .iter()
        .map(|(address, state)| {
            let resource = registry
                .require_resource(&state.type_name)
                .map_err(|e| e.at(address.as_str()))?;
            Ok(PlannedChange {
                address: address.clone(),
                type_name: state.type_name.clone(),
                action: Action::NoOp,
                data: ResourceData::from_state(resource.schema(), state),
                prior: Some(state.clone()),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if reads.is_empty() {
        return Ok(ExecuteReport::default());
    }

    progress.on_batch_start(reads.len());
    let outcomes = run_batch(reads, jobs, progress, |change| {
        refresh_instance(registry, change)
    })?;
    progress.on_batch_complete();

    Ok(ExecuteReport::from_outcomes(outcomes, 0))
}

/// Run a batch of changes, sequentially or on a rayon pool
fn run_batch<P, F>(
    changes: Vec<PlannedChange>,
    jobs: usize,
    progress: &mut P,
    op: F,
) -> Result<Vec<Outcome>>
where
    P: ProgressCallback,
    F: Fn(PlannedChange) -> Outcome + Sync,
{
    if jobs <= 1 || changes.len() == 1 {
        let mut outcomes = Vec::with_capacity(changes.len());
        for change in changes {
            progress.on_resource_start(&change.address, change.action);
            let outcome = op(change);
            progress.on_resource_complete(&outcome.address, &outcome.result);
            outcomes.push(outcome);
        }
        return Ok(outcomes);
    }

    // The progress callback is not thread-safe; report after the pool is done.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    let outcomes: Vec<Outcome> = pool.install(|| changes.into_par_iter().map(&op).collect());

    for outcome in &outcomes {
        progress.on_resource_complete(&outcome.address, &outcome.result);
    }

    Ok(outcomes)
}

/// Apply a single planned change
fn apply_change(registry: &dyn Registry, change: PlannedChange) -> Outcome {
    let PlannedChange {
        address,
        type_name,
        action,
        mut data,
        prior,
    } = change;

    let from = if prior.is_some() {
        LifecycleState::Synced
    } else {
        LifecycleState::Absent
    };

    let resource = match registry.require_resource(&type_name) {
        Ok(resource) => resource,
        Err(e) => return failed(address, action, &e, from),
    };

    let result = match action {
        Action::Create => resource.create(&mut data),
        Action::Update => {
            transition(&address, from, LifecycleState::Updating);
            resource.update(&mut data)
        }
        Action::Delete => resource.delete(&mut data),
        Action::NoOp => {
            return Outcome {
                address,
                action,
                result: ApplyResult::NoChange,
                record: RecordChange::Keep,
                lifecycle: from,
            };
        }
    };
    let current = if action == Action::Update {
        LifecycleState::Updating
    } else {
        from
    };

    match result {
        Err(e) if e.is_gone() && prior.is_some() => gone(address, action, &e, current),
        Err(e) => {
            let settled = if current == LifecycleState::Updating {
                LifecycleState::Synced
            } else {
                current
            };
            transition(&address, current, settled);
            failed(address, action, &e, settled)
        }
        Ok(()) if action == Action::Delete => {
            transition(&address, current, LifecycleState::Deleted);
            Outcome {
                address,
                action,
                result: ApplyResult::Removed,
                record: RecordChange::Remove,
                lifecycle: LifecycleState::Deleted,
            }
        }
        Ok(()) => settle(resource, address, action, &data, current),
    }
}

/// Record the document after a successful create or update
fn settle(
    resource: &dyn Resource,
    address: String,
    action: Action,
    data: &ResourceData,
    current: LifecycleState,
) -> Outcome {
    let Some(record) = data.to_instance(resource.type_name()) else {
        let error = Error::MissingId;
        if current == LifecycleState::Absent {
            return failed(address, action, &error, current);
        }
        return gone(address, action, &error, current);
    };

    if current == LifecycleState::Absent {
        transition(&address, current, LifecycleState::Created);
        transition(&address, LifecycleState::Created, LifecycleState::Synced);
    } else {
        transition(&address, current, LifecycleState::Synced);
    }

    let result = if action == Action::Create {
        ApplyResult::Created
    } else {
        ApplyResult::Modified
    };
    Outcome {
        address,
        action,
        result,
        record: RecordChange::Write(record),
        lifecycle: LifecycleState::Synced,
    }
}

/// Read one recorded instance
fn refresh_instance(registry: &dyn Registry, change: PlannedChange) -> Outcome {
    let PlannedChange {
        address,
        type_name,
        action,
        mut data,
        prior,
    } = change;
    let current = LifecycleState::Synced;

    let resource = match registry.require_resource(&type_name) {
        Ok(resource) => resource,
        Err(e) => return failed(address, action, &e, current),
    };

    if let Err(e) = resource.read(&mut data) {
        if e.is_gone() {
            return gone(address, action, &e, current);
        }
        return failed(address, action, &e, current);
    }

    match data.to_instance(&type_name) {
        Some(record) => {
            let result = if prior.as_ref() == Some(&record) {
                ApplyResult::NoChange
            } else {
                ApplyResult::Modified
            };
            Outcome {
                address,
                action,
                result,
                record: RecordChange::Write(record),
                lifecycle: current,
            }
        }
        None => gone(address, action, &Error::MissingId, current),
    }
}

/// The remote object disappeared out of band: drop the record
fn gone(address: String, action: Action, error: &Error, current: LifecycleState) -> Outcome {
    log::warn!("{}: {}; removing it from state", address, error);
    transition(&address, current, LifecycleState::Deleted);
    Outcome {
        address,
        action,
        result: ApplyResult::Removed,
        record: RecordChange::Remove,
        lifecycle: LifecycleState::Deleted,
    }
}

fn failed(address: String, action: Action, error: &Error, current: LifecycleState) -> Outcome {
    log::debug!("{}: {} failed: {}", address, action, error);
    Outcome {
        address,
        action,
        result: ApplyResult::Failed {
            error: error.to_string(),
        },
        record: RecordChange::Keep,
        lifecycle: current,
    }
}

fn transition(address: &str, from: LifecycleState, to: LifecycleState) {
    if from == to {
        return;
    }
    debug_assert!(
        from.can_transition(to),
        "illegal transition {} -> {}",
        from,
        to
    );
    log::info!("{}: {} -> {}", address, from, to);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{AutoDecline, NoProgress};
    use crate::testing::{TestRegistry, config, recorded};
    use crate::value::Value;
    use std::sync::atomic::Ordering;

    fn records(pairs: &[(&str, InstanceState)]) -> BTreeMap<String, InstanceState> {
        pairs
            .iter()
            .map(|(a, s)| (a.to_string(), s.clone()))
            .collect()
    }

    fn desired(pairs: &[(&str, &str)]) -> BTreeMap<String, crate::value::Attributes> {
        pairs
            .iter()
            .map(|(a, text)| (a.to_string(), config(text)))
            .collect()
    }

    #[test]
    fn test_execute_empty_plan() {
        let registry = TestRegistry::default();
        let report = execute_simple(ExecutionPlan::new(), &registry, &ExecuteOptions::default())
            .unwrap();

        assert_eq!(report.summary.total(), 0);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_execute_no_changes() {
        let registry = TestRegistry::default();
        let prior = records(&[("note.a", recorded("1", "a"))]);
        let plan = ExecutionPlan::build(&registry, &prior, &desired(&[("note.a", "a")])).unwrap();

        let report = execute_simple(plan, &registry, &ExecuteOptions::default()).unwrap();

        assert_eq!(report.summary.no_change, 1);
        assert_eq!(registry.note.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_execute_create_writes_record() {
        let registry = TestRegistry::default();
        let plan =
            ExecutionPlan::build(&registry, &BTreeMap::new(), &desired(&[("note.a", "abc")]))
                .unwrap();

        let report = execute_simple(plan, &registry, &ExecuteOptions::default()).unwrap();
        assert_eq!(report.summary.created, 1);

        let mut state = BTreeMap::new();
        report.commit(&mut state);
        let record = &state["note.a"];
        assert_eq!(record.id, "100");
        assert_eq!(record.attributes.get("length"), Some(&Value::from(3)));
        assert_eq!(report.outcomes[0].lifecycle, LifecycleState::Synced);
    }

    #[test]
    fn test_execute_failure_keeps_previous_record() {
        let registry = TestRegistry::default();
        let prior = records(&[("note.a", recorded("1", "a"))]);
        let plan = ExecutionPlan::build(
            &registry,
            &prior,
            &desired(&[("note.a", "fail"), ("note.b", "fail")]),
        )
        .unwrap();

        let report = execute_simple(plan, &registry, &ExecuteOptions::default()).unwrap();
        assert_eq!(report.summary.failed, 2);

        let mut state = prior.clone();
        report.commit(&mut state);
        assert_eq!(state, prior);
    }

    #[test]
    fn test_execute_parallel_matches_sequential() {
        let registry = TestRegistry::default();
        let wanted = desired(&[("note.a", "a"), ("note.b", "bb"), ("note.c", "ccc")]);
        let plan = ExecutionPlan::build(&registry, &BTreeMap::new(), &wanted).unwrap();

        let opts = ExecuteOptions {
            jobs: 3,
            ..Default::default()
        };
        let report = execute_simple(plan, &registry, &opts).unwrap();

        assert_eq!(report.summary.created, 3);
        let addresses: Vec<_> = report.outcomes.iter().map(|o| o.address.as_str()).collect();
        assert_eq!(addresses, vec!["note.a", "note.b", "note.c"]);
    }

    #[test]
    fn test_execute_declined() {
        let registry = TestRegistry::default();
        let plan =
            ExecutionPlan::build(&registry, &BTreeMap::new(), &desired(&[("note.a", "a")]))
                .unwrap();

        let report = execute(
            plan,
            &registry,
            &ExecuteOptions::default(),
            &mut NoProgress,
            &mut AutoDecline,
        )
        .unwrap();

        assert_eq!(report.summary.skipped, 1);
        assert_eq!(registry.note.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_execute_delete_removes_record() {
        let registry = TestRegistry::default();
        let prior = records(&[("note.a", recorded("1", "a"))]);
        let plan = ExecutionPlan::destroy_all(&registry, &prior).unwrap();

        let report = execute_simple(plan, &registry, &ExecuteOptions::default()).unwrap();
        assert_eq!(report.summary.removed, 1);

        let mut state = prior;
        report.commit(&mut state);
        assert!(state.is_empty());
    }

    #[test]
    fn test_refresh_drops_gone_instances() {
        let registry = TestRegistry::default();
        let mut stale = recorded("2", "abcd");
        stale.attributes.insert("length".to_string(), Value::from(1));
        let prior = records(&[
            ("note.gone", recorded("404", "a")),
            ("note.live", recorded("1", "a")),
            ("note.stale", stale),
        ]);

        let report = refresh(&registry, &prior, 1, &mut NoProgress).unwrap();
        let mut state = prior.clone();
        report.commit(&mut state);

        assert!(!state.contains_key("note.gone"));
        assert_eq!(state["note.live"], prior["note.live"]);
        assert_eq!(
            state["note.stale"].attributes.get("length"),
            Some(&Value::from(4))
        );
        assert_eq!(report.summary.removed, 1);
        assert_eq!(report.summary.modified, 1);
        assert_eq!(report.summary.no_change, 1);
    }
}
