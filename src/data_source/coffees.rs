//! `hashicups_coffees` data source: the full coffee catalog

use crate::error::Error;
use crate::flatten::flatten_coffees;
use declarative::{AttrType, Attribute, DataSource, Schema, StateDocument, Value};
use hashicups_client::Client;
use std::sync::Arc;

pub const TYPE_NAME: &str = "hashicups_coffees";

pub fn schema() -> Schema {
    let ingredient =
        Schema::new().attribute("ingredient_id", Attribute::computed(AttrType::Int));
    let coffee = Schema::new()
        .attribute("id", Attribute::computed(AttrType::Int))
        .attribute("name", Attribute::computed(AttrType::String))
        .attribute("teaser", Attribute::computed(AttrType::String))
        .attribute("description", Attribute::computed(AttrType::String))
        .attribute("price", Attribute::computed(AttrType::Int))
        .attribute("image", Attribute::computed(AttrType::String))
        .attribute(
            "ingredients",
            Attribute::computed(AttrType::List(Box::new(ingredient))),
        );

    Schema::new().attribute(
        "coffees",
        Attribute::computed(AttrType::List(Box::new(coffee))).describe("Every coffee on the menu"),
    )
}

pub struct CoffeesDataSource {
    client: Arc<Client>,
    schema: Arc<Schema>,
}

impl std::fmt::Debug for CoffeesDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoffeesDataSource").finish_non_exhaustive()
    }
}

impl CoffeesDataSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            client,
            schema: Arc::new(schema()),
        }
    }
}

impl DataSource for CoffeesDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Arc<Schema> {
        Arc::clone(&self.schema)
    }

    /// The catalog has no natural identity, so none is assigned
    fn read(&self, data: &mut dyn StateDocument) -> declarative::Result<()> {
        let coffees = self.client.get_coffees().map_err(Error::Api)?;
        log::debug!("Read {} coffee(s)", coffees.len());

        data.set("coffees", Value::List(flatten_coffees(&coffees)))?;
        data.set_id(None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::ResourceData;
    use hashicups_client::{MockBackend, MockOperation};

    fn data_source(mock: &MockBackend) -> CoffeesDataSource {
        CoffeesDataSource::new(Arc::new(Client::with_backend(Box::new(mock.clone()))))
    }

    #[test]
    fn test_read_catalog() {
        let mock = MockBackend::with_catalog();
        let coffees = data_source(&mock);

        let mut data = ResourceData::new(coffees.schema());
        coffees.read(&mut data).unwrap();

        assert!(data.id().is_none());
        assert_eq!(data.get("coffees.1.name"), Some(Value::from("Vaulatte")));
        assert_eq!(data.get("coffees.0.price"), Some(Value::from(350)));
        assert_eq!(
            data.get("coffees.0.ingredients.1.ingredient_id"),
            Some(Value::from(2))
        );
        assert_eq!(
            data.get("coffees").and_then(|v| v.as_list().map(<[Value]>::len)),
            Some(3)
        );
    }

    #[test]
    fn test_read_empty_catalog() {
        let mock = MockBackend::new();
        let coffees = data_source(&mock);

        let mut data = ResourceData::new(coffees.schema());
        coffees.read(&mut data).unwrap();
        assert_eq!(data.get("coffees"), Some(Value::List(Vec::new())));
    }

    #[test]
    fn test_read_failure_propagates() {
        let mock = MockBackend::with_catalog();
        mock.fail(MockOperation::GetCoffees, "unavailable");
        let coffees = data_source(&mock);

        let mut data = ResourceData::new(coffees.schema());
        let err = coffees.read(&mut data).unwrap_err();
        assert!(err.to_string().contains("unavailable"));
        assert!(data.get("coffees").is_none());
    }
}
