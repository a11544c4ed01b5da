//! The state document handed to lifecycle operations
//!
//! [`StateDocument`] is the contract a resource implementation sees: read
//! desired attributes, write results, ask whether an attribute changed, and
//! manage the instance identity. [`ResourceData`] is the in-memory
//! implementation backing one instance for the duration of one operation.

use crate::error::Result;
use crate::schema::Schema;
use crate::types::InstanceState;
use crate::value::{self, Attributes, Value};
use std::sync::Arc;

/// Attribute access for one resource instance
pub trait StateDocument {
    /// Current value of an attribute or dotted path (`items.0.coffee.0.id`)
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a top-level attribute
    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    /// Whether the planned value differs from the recorded one
    fn has_changed(&self, key: &str) -> bool;

    /// Assign or clear the identity
    fn set_id(&mut self, id: Option<String>);

    /// Identity, if one is assigned
    fn id(&self) -> Option<&str>;
}

/// State document for one instance
///
/// Values are layered: writes made during the operation take precedence over
/// the planned values, which combine configuration with the prior state.
#[derive(Debug, Clone)]
pub struct ResourceData {
    schema: Arc<Schema>,
    id: Option<String>,
    prior: Option<Attributes>,
    planned: Attributes,
    written: Attributes,
}

impl ResourceData {
    /// Empty document, e.g. for a data source read
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            id: None,
            prior: None,
            planned: Attributes::new(),
            written: Attributes::new(),
        }
    }

    /// Document for an instance that does not exist yet
    pub fn from_config(schema: Arc<Schema>, config: Attributes) -> Result<Self> {
        let config = schema.normalize(config);
        schema.validate_config(&config)?;
        let planned = schema.plan(&config, None);
        Ok(Self {
            planned,
            ..Self::new(schema)
        })
    }

    /// Document for a recorded instance, planned equal to its prior state
    pub fn from_state(schema: Arc<Schema>, state: &InstanceState) -> Self {
        Self {
            id: Some(state.id.clone()),
            prior: Some(state.attributes.clone()),
            planned: state.attributes.clone(),
            ..Self::new(schema)
        }
    }

    /// Document for a recorded instance with new desired configuration
    pub fn with_config(
        schema: Arc<Schema>,
        state: &InstanceState,
        config: Attributes,
    ) -> Result<Self> {
        let config = schema.normalize(config);
        schema.validate_config(&config)?;
        let planned = schema.plan(&config, Some(&state.attributes));
        Ok(Self {
            id: Some(state.id.clone()),
            prior: Some(state.attributes.clone()),
            planned,
            ..Self::new(schema)
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Planned attributes, before any writes
    pub fn planned(&self) -> &Attributes {
        &self.planned
    }

    /// Top-level attributes whose planned value differs from the prior
    pub fn changed_attributes(&self) -> Vec<String> {
        self.schema
            .iter()
            .map(|(name, _)| name)
            .filter(|name| self.has_changed(name))
            .map(str::to_string)
            .collect()
    }

    /// Resulting attributes: planned values overlaid with writes
    pub fn state(&self) -> Attributes {
        let mut attrs = self.planned.clone();
        for (name, v) in &self.written {
            attrs.insert(name.clone(), v.clone());
        }
        value::prune(attrs)
    }

    /// Recorded form of this instance, or `None` without an identity
    pub fn to_instance(&self, type_name: &str) -> Option<InstanceState> {
        self.id.as_ref().map(|id| InstanceState {
            type_name: type_name.to_string(),
            id: id.clone(),
            attributes: self.state(),
        })
    }
}

impl StateDocument for ResourceData {
    fn get(&self, key: &str) -> Option<Value> {
        let (head, rest) = value::split_path(key);
        let top = self.written.get(head).or_else(|| self.planned.get(head))?;
        let found = match rest {
            Some(rest) => top.lookup(rest)?,
            None => top,
        };
        (!found.is_null()).then(|| found.clone())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.schema.check_value(key, &value)?;
        log::debug!("set {} = {}", key, value);
        self.written.insert(key.to_string(), value);
        Ok(())
    }

    fn has_changed(&self, key: &str) -> bool {
        let planned = value::lookup(&self.planned, key);
        let prior = self.prior.as_ref().and_then(|p| value::lookup(p, key));
        planned != prior
    }

    fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
