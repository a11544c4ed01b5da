//! In-memory resource used by the crate's tests

use crate::data::StateDocument;
use crate::error::{Error, Result};
use crate::resource::{DataSource, Registry, Resource};
use crate::schema::{AttrType, Attribute, Schema};
use crate::types::InstanceState;
use crate::value::{Attributes, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// `note` resource: text is configured, length is computed
///
/// Text "fail" makes create and update fail; identity "404" reads as gone.
#[derive(Debug, Default)]
pub struct NoteResource {
    next_id: AtomicUsize,
    pub calls: AtomicUsize,
}

impl NoteResource {
    fn text(data: &dyn StateDocument) -> Result<String> {
        data.get("text")
            .and_then(|v| v.as_str().map(str::to_string))
            .ok_or_else(|| Error::MissingRequired("text".to_string()))
    }
}

impl Resource for NoteResource {
    fn type_name(&self) -> &'static str {
        "note"
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .attribute("text", Attribute::required(AttrType::String))
                .attribute("length", Attribute::computed(AttrType::Int)),
        )
    }

    fn create(&self, data: &mut dyn StateDocument) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if Self::text(data)? == "fail" {
            return Err(anyhow::anyhow!("create failed").into());
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 100;
        data.set_id(Some(id.to_string()));
        self.read(data)
    }

    fn read(&self, data: &mut dyn StateDocument) -> Result<()> {
        let id = data.id().ok_or(Error::MissingId)?.to_string();
        if id == "404" {
            return Err(Error::Gone { id });
        }
        let text = Self::text(data)?;
        data.set("length", Value::from(text.len() as i64))
    }

    fn update(&self, data: &mut dyn StateDocument) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if Self::text(data)? == "fail" {
            return Err(anyhow::anyhow!("update failed").into());
        }
        self.read(data)
    }

    fn delete(&self, data: &mut dyn StateDocument) -> Result<()> {
        data.set_id(None);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct TestRegistry {
    pub note: NoteResource,
}

impl Registry for TestRegistry {
    fn resource(&self, type_name: &str) -> Option<&dyn Resource> {
        (type_name == "note").then_some(&self.note as &dyn Resource)
    }

    fn data_source(&self, _type_name: &str) -> Option<&dyn DataSource> {
        None
    }
}

/// Desired configuration for a note
pub fn config(text: &str) -> Attributes {
    let mut attrs = Attributes::new();
    attrs.insert("text".to_string(), Value::from(text));
    attrs
}

/// Recorded note instance
pub fn recorded(id: &str, text: &str) -> InstanceState {
    let mut attributes = config(text);
    attributes.insert("length".to_string(), Value::from(text.len() as i64));
    InstanceState {
        type_name: "note".to_string(),
        id: id.to_string(),
        attributes,
    }
}
