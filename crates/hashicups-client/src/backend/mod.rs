//! Backend trait and implementations for talking to the HashiCups API.
//!
//! The primary implementation is [`http::HttpBackend`]. Use [`MockBackend`]
//! for tests without network access:
//!
//! ```
//! use hashicups_client::backend::{Backend, MockBackend};
//! use hashicups_client::OrderItem;
//!
//! let mock = MockBackend::with_catalog();
//! let order = mock.create_order(&[OrderItem::new(1, 2)]).unwrap();
//!
//! assert_eq!(order.items[0].coffee.name, "Packer Spiced Latte");
//! assert_eq!(mock.calls().create_order, 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use crate::types::{Coffee, Ingredient, Order, OrderItem};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Remote operations the provider relies on.
///
/// Every call blocks until the server answers or the transport gives up.
/// Implementations return an error for any transport failure or non-2xx
/// status and never retry on their own.
pub trait Backend: Send + Sync {
    /// Fetch the full coffee catalog.
    fn get_coffees(&self) -> Result<Vec<Coffee>>;

    /// Place a new order. The server assigns the identifier.
    fn create_order(&self, items: &[OrderItem]) -> Result<Order>;

    /// Fetch one order by identifier.
    ///
    /// # Errors
    ///
    /// Errors whose [`Error::is_not_found`] is true mean the order is gone.
    fn get_order(&self, id: &str) -> Result<Order>;

    /// Replace the full item list of an existing order.
    fn update_order(&self, id: &str, items: &[OrderItem]) -> Result<Order>;
}

/// Counters for calls made against a [`MockBackend`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// Catalog reads.
    pub get_coffees: usize,
    /// Orders placed.
    pub create_order: usize,
    /// Orders fetched.
    pub get_order: usize,
    /// Orders replaced.
    pub update_order: usize,
}

impl CallCounts {
    /// Total number of remote calls.
    #[must_use]
    pub fn total(&self) -> usize {
        self.get_coffees + self.create_order + self.get_order + self.update_order
    }
}

/// Operations that can be made to fail on a [`MockBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum MockOperation {
    GetCoffees,
    CreateOrder,
    GetOrder,
    UpdateOrder,
}

#[derive(Debug, Default)]
struct MockState {
    catalog: Vec<Coffee>,
    orders: BTreeMap<i64, Order>,
    next_id: i64,
    calls: CallCounts,
    updates: Vec<(String, Vec<OrderItem>)>,
    failures: BTreeMap<MockOperation, String>,
}

impl MockState {
    fn fail_if_configured(&self, op: MockOperation) -> Result<()> {
        match self.failures.get(&op) {
            Some(message) => Err(Error::http(message.clone(), Some(500))),
            None => Ok(()),
        }
    }

    /// Fill server-computed coffee fields from the catalog, as the API does.
    fn resolve(&self, items: &[OrderItem]) -> Vec<OrderItem> {
        items
            .iter()
            .map(|item| {
                let mut coffee = self
                    .catalog
                    .iter()
                    .find(|c| c.id == item.coffee.id)
                    .cloned()
                    .unwrap_or_else(|| Coffee::reference(item.coffee.id));
                coffee.ingredients.clear();
                OrderItem {
                    coffee,
                    quantity: item.quantity,
                }
            })
            .collect()
    }
}

/// In-memory backend for tests.
///
/// Clones share state, so a test can keep a handle for assertions after
/// handing a clone to the code under test.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    /// Create a new empty mock backend.
    #[must_use]
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().next_id = 1;
        mock
    }

    /// Create a mock backend seeded with the demo catalog.
    #[must_use]
    pub fn with_catalog() -> Self {
        let mock = Self::new();
        mock.set_catalog(vec![
            Coffee {
                id: 1,
                name: "Packer Spiced Latte".to_string(),
                teaser: "Packed with goodness to spice up your images".to_string(),
                description: String::new(),
                price: 350,
                image: "/packer.png".to_string(),
                ingredients: vec![Ingredient { ingredient_id: 1 }, Ingredient { ingredient_id: 2 }],
            },
            Coffee {
                id: 2,
                name: "Vaulatte".to_string(),
                teaser: "Nothing gives you a safe and secure feeling like a Vaulatte".to_string(),
                description: String::new(),
                price: 200,
                image: "/vault.png".to_string(),
                ingredients: vec![Ingredient { ingredient_id: 1 }],
            },
            Coffee {
                id: 3,
                name: "Nomadicano".to_string(),
                teaser: "Drink one today and you will want to schedule another".to_string(),
                description: String::new(),
                price: 150,
                image: "/nomad.png".to_string(),
                ingredients: vec![Ingredient { ingredient_id: 3 }],
            },
        ]);
        mock
    }

    /// Replace the catalog.
    pub fn set_catalog(&self, catalog: Vec<Coffee>) {
        self.state.lock().unwrap().catalog = catalog;
    }

    /// Insert an order directly, bypassing counters.
    pub fn insert_order(&self, order: Order) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(order.id + 1);
        state.orders.insert(order.id, order);
    }

    /// Remove an order, simulating an out-of-band deletion.
    pub fn remove_order(&self, id: i64) -> Option<Order> {
        self.state.lock().unwrap().orders.remove(&id)
    }

    /// Make every subsequent call of `op` fail with an HTTP 500.
    pub fn fail(&self, op: MockOperation, message: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, message.into());
    }

    /// Stop failing `op`.
    pub fn recover(&self, op: MockOperation) {
        self.state.lock().unwrap().failures.remove(&op);
    }

    /// Calls made so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.state.lock().unwrap().calls
    }

    /// Item lists received by `update_order`, in call order.
    #[must_use]
    pub fn updates(&self) -> Vec<(String, Vec<OrderItem>)> {
        self.state.lock().unwrap().updates.clone()
    }

    /// Current server-side copy of an order.
    #[must_use]
    pub fn order(&self, id: i64) -> Option<Order> {
        self.state.lock().unwrap().orders.get(&id).cloned()
    }
}

fn parse_id(id: &str) -> Result<i64> {
    id.parse()
        .map_err(|_| Error::http(format!("invalid order id: {}", id), Some(400)))
}

impl Backend for MockBackend {
    fn get_coffees(&self) -> Result<Vec<Coffee>> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_coffees += 1;
        state.fail_if_configured(MockOperation::GetCoffees)?;
        Ok(state.catalog.clone())
    }

    fn create_order(&self, items: &[OrderItem]) -> Result<Order> {
        let mut state = self.state.lock().unwrap();
        state.calls.create_order += 1;
        state.fail_if_configured(MockOperation::CreateOrder)?;

        let order = Order {
            id: state.next_id,
            items: state.resolve(items),
        };
        state.next_id += 1;
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    fn get_order(&self, id: &str) -> Result<Order> {
        let mut state = self.state.lock().unwrap();
        state.calls.get_order += 1;
        state.fail_if_configured(MockOperation::GetOrder)?;

        let key = parse_id(id)?;
        state
            .orders
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::http(format!("order {} not found", id), Some(404)))
    }

    fn update_order(&self, id: &str, items: &[OrderItem]) -> Result<Order> {
        let mut state = self.state.lock().unwrap();
        state.calls.update_order += 1;
        state.updates.push((id.to_string(), items.to_vec()));
        state.fail_if_configured(MockOperation::UpdateOrder)?;

        let key = parse_id(id)?;
        if !state.orders.contains_key(&key) {
            return Err(Error::OrderNotFound(id.to_string()));
        }
        let order = Order {
            id: key,
            items: state.resolve(items),
        };
        state.orders.insert(key, order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_backend_new() {
        let mock = MockBackend::new();
        assert!(mock.get_coffees().unwrap().is_empty());
        assert_eq!(mock.calls().get_coffees, 1);
    }

    #[test]
    fn test_mock_backend_create_assigns_ids() {
        let mock = MockBackend::with_catalog();
        let first = mock.create_order(&[OrderItem::new(1, 1)]).unwrap();
        let second = mock.create_order(&[OrderItem::new(2, 1)]).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.items[0].coffee.name, "Vaulatte");
        assert!(second.items[0].coffee.ingredients.is_empty());
    }

    #[test]
    fn test_mock_backend_get_missing_order() {
        let mock = MockBackend::new();
        let err = mock.get_order("42").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_mock_backend_update_replaces_items() {
        let mock = MockBackend::with_catalog();
        let order = mock
            .create_order(&[OrderItem::new(1, 4), OrderItem::new(3, 3)])
            .unwrap();

        let updated = mock
            .update_order(&order.id_string(), &[OrderItem::new(2, 1)])
            .unwrap();

        assert_eq!(updated.id, order.id);
        assert_eq!(updated.items.len(), 1);
        assert_eq!(mock.order(order.id).unwrap().items[0].coffee.id, 2);
        assert_eq!(mock.updates().len(), 1);
    }

    #[test]
    fn test_mock_backend_injected_failure() {
        let mock = MockBackend::with_catalog();
        mock.fail(MockOperation::CreateOrder, "boom");

        let err = mock.create_order(&[OrderItem::new(1, 1)]).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert_eq!(mock.calls().create_order, 1);

        mock.recover(MockOperation::CreateOrder);
        assert!(mock.create_order(&[OrderItem::new(1, 1)]).is_ok());
    }

    #[test]
    fn test_mock_backend_remove_order() {
        let mock = MockBackend::with_catalog();
        let order = mock.create_order(&[OrderItem::new(1, 1)]).unwrap();
        assert!(mock.remove_order(order.id).is_some());
        assert!(mock.get_order(&order.id_string()).unwrap_err().is_not_found());
    }
}
