//! `hashicups_order` data source: look up an existing order by id

use crate::error::Error;
use crate::flatten::flatten_order_items_data;
use declarative::{AttrType, Attribute, DataSource, Schema, StateDocument, Value};
use hashicups_client::Client;
use std::sync::Arc;

pub const TYPE_NAME: &str = "hashicups_order";

pub fn schema() -> Schema {
    let item = Schema::new()
        .attribute("coffee_id", Attribute::computed(AttrType::Int))
        .attribute("coffee_name", Attribute::computed(AttrType::String))
        .attribute("coffee_teaser", Attribute::computed(AttrType::String))
        .attribute("coffee_description", Attribute::computed(AttrType::String))
        .attribute("coffee_price", Attribute::computed(AttrType::Int))
        .attribute("coffee_image", Attribute::computed(AttrType::String))
        .attribute("quantity", Attribute::computed(AttrType::Int));

    Schema::new()
        .attribute(
            "id",
            Attribute::required(AttrType::Int).describe("Order id to look up"),
        )
        .attribute(
            "items",
            Attribute::computed(AttrType::List(Box::new(item))),
        )
}

pub struct OrderDataSource {
    client: Arc<Client>,
    schema: Arc<Schema>,
}

impl std::fmt::Debug for OrderDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderDataSource").finish_non_exhaustive()
    }
}

impl OrderDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            schema: Arc::new(schema()),
        }
    }
}

impl DataSource for OrderDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    fn read(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        let id = data
            .get("id")
            .and_then(|v| v.as_int())
            .ok_or_else(|| Error::contract("id", "expected a number"))?
            .to_string();

        let order = self
            .client
            .get_order(&id)
            .map_err(|e| Error::from_api(&id, e))?;
        log::debug!("Read order {} ({} item(s))", id, order.items.len());

        data.set(
            "items",
            Value::List(flatten_order_items_data(Some(&order.items))),
        )?;
        data.set_id(Some(id));
        Ok(())
    }
}
