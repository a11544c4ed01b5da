//! Resource and data source traits
//!
//! A [`Resource`] maps one kind of remote object onto a [`StateDocument`]:
//! it reads desired attributes from the document, talks to the remote
//! system, and writes results (including the identity) back. A
//! [`DataSource`] is the read-only counterpart.

use crate::data::StateDocument;
use crate::error::Result;
use crate::schema::Schema;
use std::fmt;
use std::sync::Arc;

/// Core trait for managed resources
///
/// Every operation is handed the state document of exactly one instance and
/// runs to completion before the next operation on that instance begins.
///
/// # Example
///
/// ```ignore
/// use declarative::{AttrType, Attribute, Resource, Result, Schema, StateDocument};
/// use std::sync::Arc;
///
/// #[derive(Debug)]
/// struct Note;
///
/// impl Resource for Note {
///     fn type_name(&self) -> &'static str { "note" }
///
///     fn schema(&self) -> Arc<Schema> {
///         Arc::new(Schema::new().attribute("text", Attribute::required(AttrType::String)))
///     }
///
///     fn create(&self, data: &mut dyn StateDocument) -> Result<()> {
///         data.set_id(Some("1".into()));
///         self.read(data)
///     }
///
///     fn read(&self, _data: &mut dyn StateDocument) -> Result<()> { Ok(()) }
///     fn update(&self, data: &mut dyn StateDocument) -> Result<()> { self.read(data) }
///
///     fn delete(&self, data: &mut dyn StateDocument) -> Result<()> {
///         data.set_id(None);
///         Ok(())
///     }
/// }
/// ```
pub trait Resource: Send + Sync + fmt::Debug {
    /// Type name used in addresses (e.g. "hashicups_order")
    fn type_name(&self) -> &'static str;

    /// Attributes of this resource
    fn schema(&self) -> Arc<Schema>;

    /// Create the remote object and assign the identity
    ///
    /// On error no identity may be left assigned.
    fn create(&self, data: &mut dyn StateDocument) -> Result<()>;

    /// Refresh the document from the remote object
    ///
    /// Returns [`Error::Gone`](crate::Error::Gone) when the object no longer
    /// exists.
    fn read(&self, data: &mut dyn StateDocument) -> Result<()>;

    /// Push changed attributes to the remote object
    fn update(&self, data: &mut dyn StateDocument) -> Result<()>;

    /// Remove the instance, clearing the identity
    fn delete(&self, data: &mut dyn StateDocument) -> Result<()>;
}

/// Read-only view onto remote data
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Type name (e.g. "hashicups_coffees")
    fn type_name(&self) -> &'static str;

    /// Attributes of this data source
    fn schema(&self) -> Arc<Schema>;

    /// Populate the document from the remote system
    fn read(&self, data: &mut dyn StateDocument) -> Result<()>;
}

/// Lookup of resources and data sources by type name
pub trait Registry: Send + Sync {
    fn resource(&self, type_name: &str) -> Option<&dyn Resource>;

    fn data_source(&self, type_name: &str) -> Option<&dyn DataSource>;

    /// Resource for a type, or [`Error::UnknownType`](crate::Error::UnknownType)
    fn require_resource(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resource(type_name)
            .ok_or_else(|| crate::Error::UnknownType(type_name.to_string()))
    }

    /// Data source for a type, or [`Error::UnknownType`](crate::Error::UnknownType)
    fn require_data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        self.data_source(type_name)
            .ok_or_else(|| crate::Error::UnknownType(type_name.to_string()))
    }
}
