//! Attribute schemas
//!
//! A [`Schema`] declares the attributes of a resource or data source and of
//! every nested block. It is used to:
//! - validate configuration before any remote call is made
//! - type-check values written into the state document
//! - compute planned values, carrying computed attributes over from the
//!   prior state so they never show up as changes

use crate::error::{Error, Result};
use crate::value::{Attributes, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Type of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrType {
    Bool,
    Int,
    String,
    /// List of nested blocks
    List(Box<Schema>),
}

impl AttrType {
    fn name(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "number",
            Self::String => "string",
            Self::List(_) => "list",
        }
    }
}

/// Who provides an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Must be configured
    Required,
    /// Set by the provider only
    Computed,
    /// May be configured, otherwise set by the provider
    OptionalComputed,
}

impl Mode {
    pub fn is_configurable(self) -> bool {
        !matches!(self, Self::Computed)
    }

    pub fn is_computed(self) -> bool {
        matches!(self, Self::Computed | Self::OptionalComputed)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Required => "required",
            Self::Computed => "computed",
            Self::OptionalComputed => "optional, computed",
        };
        write!(f, "{}", s)
    }
}

/// Declaration of a single attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub ty: AttrType,
    pub mode: Mode,
    /// Upper bound for list attributes; 1 models a single nested object
    pub max_items: Option<usize>,
    pub description: String,
}

impl Attribute {
    fn new(ty: AttrType, mode: Mode) -> Self {
        Self {
            ty,
            mode,
            max_items: None,
            description: String::new(),
        }
    }

    pub fn required(ty: AttrType) -> Self {
        Self::new(ty, Mode::Required)
    }

    pub fn computed(ty: AttrType) -> Self {
        Self::new(ty, Mode::Computed)
    }

    pub fn optional_computed(ty: AttrType) -> Self {
        Self::new(ty, Mode::OptionalComputed)
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Whether this is a list capped at one element
    pub fn is_single_block(&self) -> bool {
        matches!(self.ty, AttrType::List(_)) && self.max_items == Some(1)
    }
}

/// Attributes of a resource, data source, or nested block
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder style)
    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Wrap single nested objects into one-element lists
    ///
    /// Configuration may write a block capped at one element either as an
    /// object or as a list; state always stores the list form.
    pub fn normalize(&self, config: Attributes) -> Attributes {
        config
            .into_iter()
            .map(|(name, value)| {
                let value = match self.get(&name) {
                    Some(attr) => normalize_value(attr, value),
                    None => value,
                };
                (name, value)
            })
            .collect()
    }

    /// Validate configuration against this schema
    pub fn validate_config(&self, config: &Attributes) -> Result<()> {
        self.validate_config_at("", config)
    }

    fn validate_config_at(&self, prefix: &str, config: &Attributes) -> Result<()> {
        for (name, value) in config {
            let path = join(prefix, name);
            let attr = self
                .get(name)
                .ok_or_else(|| Error::UnknownAttribute(path.clone()))?;

            if value.is_null() {
                continue;
            }
            if !attr.mode.is_configurable() {
                return Err(Error::ComputedOnly(path));
            }
            check_type(&path, attr, value, true)?;
        }

        for (name, attr) in self.iter() {
            if attr.mode == Mode::Required && config.get(name).is_none_or(Value::is_null) {
                return Err(Error::MissingRequired(join(prefix, name)));
            }
        }

        Ok(())
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Type-check a value written by the provider
    pub fn check_value(&self, name: &str, value: &Value) -> Result<()> {
        let attr = self
            .get(name)
            .ok_or_else(|| Error::UnknownAttribute(name.to_string()))?;
        if value.is_null() {
            return Ok(());
        }
        check_type(name, attr, value, false)
    }

    /// Compute planned attributes from configuration and prior state
    ///
    /// Configured values win. Computed attributes, and optional+computed ones
    /// left unconfigured, keep their prior value. Nested blocks are matched
    /// to prior blocks by position.
    pub fn plan(&self, config: &Attributes, prior: Option<&Attributes>) -> Attributes {
        let mut planned = Attributes::new();

        for (name, attr) in self.iter() {
            let configured = config.get(name).filter(|v| !v.is_null());
            let previous = prior.and_then(|p| p.get(name)).filter(|v| !v.is_null());

            let value = match (attr.mode, configured) {
                (Mode::Computed, _) => previous.cloned(),
                (_, Some(value)) => Some(plan_value(attr, value, previous)),
                (Mode::OptionalComputed, None) => previous.cloned(),
                (_, None) => None,
            };

            if let Some(value) = value {
                planned.insert(name.to_string(), value);
            }
        }

        planned
    }
}

fn plan_value(attr: &Attribute, configured: &Value, previous: Option<&Value>) -> Value {
    match (&attr.ty, configured) {
        (AttrType::List(nested), Value::List(items)) => {
            let prior_items = previous.and_then(Value::as_list).unwrap_or_default();
            Value::List(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| match item.as_object() {
                        Some(block) => {
                            let prior_block = prior_items.get(i).and_then(Value::as_object);
                            Value::Object(nested.plan(block, prior_block))
                        }
                        None => item.clone(),
                    })
                    .collect(),
            )
        }
        _ => configured.clone(),
    }
}

fn normalize_value(attr: &Attribute, value: Value) -> Value {
    let AttrType::List(nested) = &attr.ty else {
        return value;
    };
    let items = match value {
        Value::Object(block) if attr.is_single_block() => vec![Value::Object(block)],
        Value::List(items) => items,
        other => return other,
    };
    Value::List(
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(block) => Value::Object(nested.normalize(block)),
                other => other,
            })
            .collect(),
    )
}

fn check_type(path: &str, attr: &Attribute, value: &Value, config: bool) -> Result<()> {
    let matches = matches!(
        (&attr.ty, value),
        (AttrType::Bool, Value::Bool(_))
            | (AttrType::Int, Value::Int(_))
            | (AttrType::String, Value::String(_))
            | (AttrType::List(_), Value::List(_))
    );
    if !matches {
        return Err(Error::TypeMismatch {
            path: path.to_string(),
            expected: attr.ty.name(),
            found: value.kind(),
        });
    }

    let (AttrType::List(nested), Value::List(items)) = (&attr.ty, value) else {
        return Ok(());
    };

    if let Some(max) = attr.max_items
        && items.len() > max
    {
        return Err(Error::TooManyItems {
            path: path.to_string(),
            max,
            found: items.len(),
        });
    }
    if config && attr.mode == Mode::Required && items.is_empty() {
        return Err(Error::TooFewItems(path.to_string()));
    }

    for (i, item) in items.iter().enumerate() {
        let item_path = format!("{}.{}", path, i);
        let block = item.as_object().ok_or_else(|| Error::TypeMismatch {
            path: item_path.clone(),
            expected: "object",
            found: item.kind(),
        })?;

        if config {
            nested.validate_config_at(&item_path, block)?;
        } else {
            for (name, value) in block {
                let nested_path = join(&item_path, name);
                let nested_attr = nested
                    .get(name)
                    .ok_or_else(|| Error::UnknownAttribute(nested_path.clone()))?;
                if !value.is_null() {
                    check_type(&nested_path, nested_attr, value, false)?;
                }
            }
        }
    }

    Ok(())
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}
