//! The HashiCups provider: one configured client shared by every resource
//! and data source

use crate::config::ProviderConfig;
use crate::data_source::{CoffeesDataSource, OrderDataSource};
use crate::resource::OrderResource;
use declarative::{Attributes, DataSource, Registry, Resource, ResourceData};
use hashicups_client::Client;
use std::sync::Arc;

#[derive(Debug)]
pub struct Provider {
    order: OrderResource,
    coffees: CoffeesDataSource,
    order_data: OrderDataSource,
}

impl Provider {
    pub fn new(client: Arc<Client>) -> Self {
        Self {
            order: OrderResource::new(Arc::clone(&client)),
            coffees: CoffeesDataSource::new(Arc::clone(&client)),
            order_data: OrderDataSource::new(client),
        }
    }

    /// Build the client from configuration, signing in when credentials are set
    pub fn configure(config: &ProviderConfig) -> hashicups_client::Result<Self> {
        let credentials = config.credentials();
        if credentials.is_none() {
            log::debug!("No credentials configured; order operations will be rejected");
        }
        let client = Client::connect_with_timeout(&config.host, credentials, config.timeout())?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn resources(&self) -> Vec<&dyn Resource> {
        vec![&self.order]
    }

    pub fn data_sources(&self) -> Vec<&dyn DataSource> {
        vec![&self.coffees, &self.order_data]
    }

    /// Run a data source read with the given arguments
    pub fn read_data_source(
        &self,
        type_name: &str,
        args: Attributes,
    ) -> declarative::Result<ResourceData> {
        let source = self.require_data_source(type_name)?;
        let mut data =
            ResourceData::from_config(source.schema(), args).map_err(|e| e.at(type_name))?;
        source.read(&mut data)?;
        Ok(data)
    }
}

impl Registry for Provider {
    fn resource(&self, type_name: &str) -> Option<&dyn Resource> {
        self.resources()
            .into_iter()
            .find(|r| r.type_name() == type_name)
    }

    fn data_source(&self, type_name: &str) -> Option<&dyn DataSource> {
        self.data_sources()
            .into_iter()
            .find(|d| d.type_name() == type_name)
    }
}
