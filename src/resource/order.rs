//! `hashicups_order` resource
//!
//! Lifecycle of a remote order:
//! - Create places the order, records its id, then reads it back so the
//!   computed coffee fields are populated
//! - Read replaces `items` with what the API reports
//! - Update sends the full item list only when `items` changed, stamps
//!   `last_updated`, then reads back
//! - Delete only forgets the order locally; the API has no delete call

use crate::error::Error;
use crate::flatten::{expand_order_items, flatten_order_items};
use chrono::{SecondsFormat, Utc};
use declarative::{AttrType, Attribute, Resource, Schema, StateDocument, Value};
use hashicups_client::{Client, Order, OrderItem};
use std::sync::Arc;

pub const TYPE_NAME: &str = "hashicups_order";

/// Schema of the nested `coffee` block
fn coffee_schema() -> Schema {
    Schema::new()
        .attribute(
            "id",
            Attribute::required(AttrType::Int).describe("Catalog id of the coffee"),
        )
        .attribute("name", Attribute::computed(AttrType::String))
        .attribute("teaser", Attribute::computed(AttrType::String))
        .attribute("description", Attribute::computed(AttrType::String))
        .attribute(
            "price",
            Attribute::computed(AttrType::Int).describe("Price in cents"),
        )
        .attribute("image", Attribute::computed(AttrType::String))
}

pub fn schema() -> Schema {
    let item = Schema::new()
        .attribute(
            "coffee",
            Attribute::required(AttrType::List(Box::new(coffee_schema())))
                .max_items(1)
                .describe("The ordered coffee"),
        )
        .attribute(
            "quantity",
            Attribute::required(AttrType::Int).describe("Number of cups"),
        );

    Schema::new()
        .attribute(
            "items",
            Attribute::required(AttrType::List(Box::new(item))).describe("Order lines, in order"),
        )
        .attribute(
            "last_updated",
            Attribute::optional_computed(AttrType::String)
                .describe("Time of the last successful update (RFC 3339)"),
        )
}

/// Current time as stored in `last_updated`
///
/// Microsecond precision with a `Z` suffix keeps values lexically ordered.
fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[derive(Clone)]
pub struct OrderResource {
    client: Arc<Client>,
    schema: Arc<Schema>,
}

impl std::fmt::Debug for OrderResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderResource").finish_non_exhaustive()
    }
}

impl OrderResource {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            schema: Arc::new(schema()),
        }
    }

    /// Desired items from the document, in API shape
    fn desired_items(data: &dyn StateDocument) -> crate::error::Result<Vec<OrderItem>> {
        match data.get("items") {
            Some(Value::List(items)) => expand_order_items(&items),
            Some(other) => Err(Error::contract(
                "items",
                format!("expected a list, found {}", other.kind()),
            )),
            None => Err(Error::contract("items", "missing")),
        }
    }

    fn write_order(data: &mut dyn StateDocument, order: &Order) -> declarative::Result<()> {
        data.set(
            "items",
            Value::List(flatten_order_items(Some(&order.items))),
        )
    }
}

impl Resource for OrderResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn create(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        let items = Self::desired_items(data)?;
        let order = self.client.create_order(&items).map_err(Error::Api)?;

        let id = order.id_string();
        data.set_id(Some(id.clone()));
        log::info!("Created order {} with {} item(s)", id, order.items.len());

        if let Err(e) = self.read(data) {
            log::warn!(
                "Order {} was created but could not be read back ({}); recording the create response",
                id,
                e
            );
            if let Err(e) = Self::write_order(data, &order) {
                log::warn!("Order {} items could not be recorded ({}); keeping its id", id, e);
            }
        }
        Ok(())
    }

    fn read(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        let id = data.id().ok_or(declarative::Error::MissingId)?.to_string();
        let order = self
            .client
            .get_order(&id)
            .map_err(|e| Error::from_api(&id, e))?;

        log::debug!("Read order {} ({} item(s))", id, order.items.len());
        Self::write_order(data, &order)
    }

    fn update(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        let id = data.id().ok_or(declarative::Error::MissingId)?.to_string();

        if !data.has_changed("items") {
            log::debug!("Order {} unchanged, refreshing", id);
            return self.read(data);
        }

        let items = Self::desired_items(data)?;
        let order = self
            .client
            .update_order(&id, &items)
            .map_err(|e| Error::from_api(&id, e))?;

        data.set("last_updated", Value::from(timestamp()))?;
        log::info!("Updated order {} to {} item(s)", id, items.len());

        match self.read(data) {
            Ok(()) => Ok(()),
            Err(e) if e.is_gone() => Err(e),
            Err(e) => {
                log::warn!(
                    "Order {} was updated but could not be read back ({}); recording the update response",
                    id,
                    e
                );
                Self::write_order(data, &order)
            }
        }
    }

    fn delete(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        if let Some(id) = data.id() {
            log::info!("Removing order {} from state", id);
        }
        data.set_id(None);
        Ok(())
    }
}
