//! # hashicups-client
//!
//! Blocking client for the HashiCups coffee ordering API.
//!
//! This crate provides:
//! - Typed records for coffees, orders and order items
//! - A [`Backend`](backend::Backend) trait with an HTTP implementation
//! - An in-memory [`MockBackend`] for tests
//!
//! ## Example
//!
//! ```no_run
//! use hashicups_client::{Client, OrderItem};
//!
//! let client = Client::connect("http://localhost:19090", Some(("education", "test123")))
//!     .expect("sign-in failed");
//!
//! let order = client.create_order(&[OrderItem::new(1, 4), OrderItem::new(3, 3)]).unwrap();
//! println!("Placed order {}", order.id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod error;
pub mod types;

pub use backend::{CallCounts, MockBackend, MockOperation};
pub use error::{Error, ErrorCategory, Result};
pub use types::{AuthResponse, Coffee, Ingredient, Order, OrderItem};

use backend::Backend;
use backend::http::HttpBackend;
use std::time::Duration;

/// High-level client for HashiCups operations.
///
/// The client owns one backend and forwards every call to it. Cloning is not
/// needed: the provider builds one client at startup and shares it by
/// reference.
pub struct Client {
    backend: Box<dyn Backend>,
}

impl Client {
    /// Create an HTTP client, signing in when credentials are given.
    pub fn connect(host: &str, credentials: Option<(&str, &str)>) -> Result<Self> {
        Self::connect_with_timeout(host, credentials, backend::http::DEFAULT_TIMEOUT)
    }

    /// Like [`Client::connect`] with an explicit request timeout.
    pub fn connect_with_timeout(
        host: &str,
        credentials: Option<(&str, &str)>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut http = HttpBackend::with_timeout(host, timeout);
        if let Some((username, password)) = credentials {
            let auth = http.sign_in(username, password)?;
            log::info!("Signed in to {} as {}", http.host(), auth.username);
        }
        Ok(Self::with_backend(Box::new(http)))
    }

    /// Create a client with a custom backend (useful for testing).
    #[must_use]
    pub fn with_backend(backend: Box<dyn Backend>) -> Self {
        Self { backend }
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Fetch the full coffee catalog.
    pub fn get_coffees(&self) -> Result<Vec<Coffee>> {
        self.backend.get_coffees()
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Place a new order.
    pub fn create_order(&self, items: &[OrderItem]) -> Result<Order> {
        self.backend.create_order(items)
    }

    /// Fetch an order by identifier.
    pub fn get_order(&self, id: &str) -> Result<Order> {
        self.backend.get_order(id)
    }

    /// Replace the items of an order.
    pub fn update_order(&self, id: &str, items: &[OrderItem]) -> Result<Order> {
        self.backend.update_order(id, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_mock_backend() {
        let mock = MockBackend::with_catalog();
        let client = Client::with_backend(Box::new(mock.clone()));

        let coffees = client.get_coffees().unwrap();
        assert_eq!(coffees.len(), 3);
        assert_eq!(mock.calls().get_coffees, 1);
    }

    #[test]
    fn test_client_order_lifecycle() {
        let mock = MockBackend::with_catalog();
        let client = Client::with_backend(Box::new(mock.clone()));

        let order = client
            .create_order(&[OrderItem::new(1, 4), OrderItem::new(3, 3)])
            .unwrap();
        let fetched = client.get_order(&order.id_string()).unwrap();
        assert_eq!(fetched, order);

        let updated = client
            .update_order(&order.id_string(), &[OrderItem::new(2, 2)])
            .unwrap();
        assert_eq!(updated.items[0].coffee.name, "Vaulatte");
        assert_eq!(mock.calls().total(), 3);
    }

    #[test]
    fn test_client_get_order_not_found() {
        let client = Client::with_backend(Box::new(MockBackend::new()));
        let err = client.get_order("99").unwrap_err();
        assert!(err.is_not_found());
    }
}
