//! Execution planner - compares desired configuration with recorded state

use crate::data::ResourceData;
use crate::error::{Error, Result};
use crate::resource::Registry;
use crate::types::{Action, InstanceState, parse_address};
use crate::value::Attributes;
use std::collections::BTreeMap;

/// One instance and the operation planned for it
#[derive(Debug, Clone)]
pub struct PlannedChange {
    /// Instance address (`type.name`)
    pub address: String,
    pub type_name: String,
    pub action: Action,
    /// Document the operation will run against
    pub data: ResourceData,
    /// Record before this change, if any
    pub prior: Option<InstanceState>,
}

impl PlannedChange {
    /// Top-level attributes the change touches
    pub fn changed_attributes(&self) -> Vec<String> {
        match self.action {
            Action::NoOp => Vec::new(),
            Action::Delete => self
                .prior
                .as_ref()
                .map(|p| p.attributes.keys().cloned().collect())
                .unwrap_or_default(),
            Action::Create | Action::Update => self.data.changed_attributes(),
        }
    }
}

/// Planned changes, ordered by address
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub changes: Vec<PlannedChange>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the changes that converge `prior` onto `desired`
    ///
    /// `desired` maps instance addresses to their configuration. Every
    /// configuration is validated before anything is planned; the first
    /// invalid instance aborts planning.
    pub fn build(
        registry: &dyn Registry,
        prior: &BTreeMap<String, InstanceState>,
        desired: &BTreeMap<String, Attributes>,
    ) -> Result<Self> {
        let mut changes = Vec::with_capacity(desired.len());

        for (address, config) in desired {
            let (type_name, _) = parse_address(address)
                .ok_or_else(|| Error::UnknownType(address.clone()).at(address.as_str()))?;
            let resource = registry
                .require_resource(type_name)
                .map_err(|e| e.at(address.as_str()))?;
            let schema = resource.schema();

            let change = match prior.get(address) {
                Some(state) => {
                    let data = ResourceData::with_config(schema, state, config.clone())
                        .map_err(|e| e.at(address.as_str()))?;
                    let action = if data.changed_attributes().is_empty() {
                        Action::NoOp
                    } else {
                        Action::Update
                    };
                    PlannedChange {
                        address: address.clone(),
                        type_name: type_name.to_string(),
                        action,
                        data,
                        prior: Some(state.clone()),
                    }
                }
                None => PlannedChange {
                    address: address.clone(),
                    type_name: type_name.to_string(),
                    action: Action::Create,
                    data: ResourceData::from_config(schema, config.clone())
                        .map_err(|e| e.at(address.as_str()))?,
                    prior: None,
                },
            };
            changes.push(change);
        }

        for (address, state) in prior {
            if !desired.contains_key(address) {
                changes.push(delete_change(registry, address, state)?);
            }
        }

        changes.sort_by(|a, b| a.address.cmp(&b.address));
        Ok(Self { changes })
    }

    /// Plan the removal of every recorded instance
    pub fn destroy_all(
        registry: &dyn Registry,
        prior: &BTreeMap<String, InstanceState>,
    ) -> Result<Self> {
        let changes = prior
            .iter()
            .map(|(address, state)| delete_change(registry, address, state))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { changes })
    }

    /// Changes that will actually run
    pub fn pending(&self) -> impl Iterator<Item = &PlannedChange> {
        self.changes.iter().filter(|c| c.action.is_change())
    }

    /// Number of changes that will actually run
    pub fn total_changes(&self) -> usize {
        self.pending().count()
    }

    /// Check if plan has nothing to do
    pub fn is_empty(&self) -> bool {
        self.total_changes() == 0
    }
}

fn delete_change(
    registry: &dyn Registry,
    address: &str,
    state: &InstanceState,
) -> Result<PlannedChange> {
    let resource = registry
        .require_resource(&state.type_name)
        .map_err(|e| e.at(address))?;
    Ok(PlannedChange {
        address: address.to_string(),
        type_name: state.type_name.clone(),
        action: Action::Delete,
        data: ResourceData::from_state(resource.schema(), state),
        prior: Some(state.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{TestRegistry, config, recorded};

    #[test]
    fn test_build_create_update_noop_delete() {
        let registry = TestRegistry::default();

        let mut prior = BTreeMap::new();
        prior.insert("note.same".to_string(), recorded("1", "a"));
        prior.insert("note.edit".to_string(), recorded("2", "a"));
        prior.insert("note.gone".to_string(), recorded("3", "a"));

        let mut desired = BTreeMap::new();
        desired.insert("note.same".to_string(), config("a"));
        desired.insert("note.edit".to_string(), config("b"));
        desired.insert("note.new".to_string(), config("c"));

        let plan = ExecutionPlan::build(&registry, &prior, &desired).unwrap();
        let actions: Vec<_> = plan
            .changes
            .iter()
            .map(|c| (c.address.as_str(), c.action))
            .collect();

        assert_eq!(
            actions,
            vec![
                ("note.edit", Action::Update),
                ("note.gone", Action::Delete),
                ("note.new", Action::Create),
                ("note.same", Action::NoOp),
            ]
        );
        assert_eq!(plan.total_changes(), 3);
        assert_eq!(plan.changes[0].changed_attributes(), vec!["text".to_string()]);
    }

    #[test]
    fn test_build_rejects_invalid_config() {
        let registry = TestRegistry::default();
        let mut desired = BTreeMap::new();
        desired.insert("note.bad".to_string(), Attributes::new());

        let err = ExecutionPlan::build(&registry, &BTreeMap::new(), &desired).unwrap_err();
        assert!(err.to_string().starts_with("note.bad: "));
    }

    #[test]
    fn test_build_rejects_unknown_type() {
        let registry = TestRegistry::default();
        let mut desired = BTreeMap::new();
        desired.insert("widget.x".to_string(), config("a"));

        let err = ExecutionPlan::build(&registry, &BTreeMap::new(), &desired).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfig { ref source, .. } if matches!(**source, Error::UnknownType(_))
        ));
    }

    #[test]
    fn test_destroy_all() {
        let registry = TestRegistry::default();
        let mut prior = BTreeMap::new();
        prior.insert("note.a".to_string(), recorded("1", "a"));
        prior.insert("note.b".to_string(), recorded("2", "b"));

        let plan = ExecutionPlan::destroy_all(&registry, &prior).unwrap();
        assert_eq!(plan.total_changes(), 2);
        assert!(plan.changes.iter().all(|c| c.action == Action::Delete));
    }

    #[test]
    fn test_empty_plan() {
        let plan = ExecutionPlan::new();
        assert!(plan.is_empty());
    }
}
