//! Core types for the HashiCups API.
//!
//! These are the typed records exchanged with the remote service. They carry
//! no knowledge of the declarative attribute model; conversion to and from
//! flat attributes happens in the provider.

use serde::{Deserialize, Serialize};

/// A coffee from the server-owned catalog.
///
/// Only `id` is meaningful when a coffee is referenced from an order
/// request; every other field is computed by the server.
///
/// # Example
///
/// ```
/// use hashicups_client::Coffee;
///
/// let coffee = Coffee::reference(3);
/// assert_eq!(coffee.id, 3);
/// assert!(coffee.name.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Coffee {
    /// Catalog identifier.
    pub id: i64,
    /// Display name (e.g. "Packer Spiced Latte").
    #[serde(default)]
    pub name: String,
    /// Short marketing line.
    #[serde(default)]
    pub teaser: String,
    /// Long description, often empty.
    #[serde(default)]
    pub description: String,
    /// Price in cents.
    #[serde(default)]
    pub price: i64,
    /// Relative image path served by the API.
    #[serde(default)]
    pub image: String,
    /// Ingredients, only populated by catalog reads.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ingredients: Vec<Ingredient>,
}

impl Coffee {
    /// Create a coffee that only carries its identifier.
    ///
    /// This is the shape used when placing or updating an order.
    #[must_use]
    pub fn reference(id: i64) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}

/// An ingredient reference attached to a catalog coffee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Ingredient identifier.
    pub ingredient_id: i64,
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// The ordered coffee.
    pub coffee: Coffee,
    /// Number of cups.
    pub quantity: i64,
}

impl OrderItem {
    /// Create an order line referencing a coffee by id.
    #[must_use]
    pub fn new(coffee_id: i64, quantity: i64) -> Self {
        Self {
            coffee: Coffee::reference(coffee_id),
            quantity,
        }
    }
}

/// An order as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Server-assigned identifier.
    pub id: i64,
    /// Order lines, in the order they were submitted.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The identifier as used in request paths and resource identities.
    #[must_use]
    pub fn id_string(&self) -> String {
        self.id.to_string()
    }
}

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Numeric user id.
    #[serde(rename = "UserID")]
    pub user_id: i64,
    /// User name echoed back by the server.
    #[serde(rename = "Username")]
    pub username: String,
    /// Bearer token for subsequent requests.
    pub token: String,
}

// =============================================================================
// Wire payloads
// =============================================================================

/// Order line as sent to the API: only the coffee id and the quantity.
#[derive(Debug, Serialize)]
pub(crate) struct OrderItemPayload {
    coffee: CoffeeRef,
    quantity: i64,
}

#[derive(Debug, Serialize)]
struct CoffeeRef {
    id: i64,
}

impl From<&OrderItem> for OrderItemPayload {
    fn from(item: &OrderItem) -> Self {
        Self {
            coffee: CoffeeRef { id: item.coffee.id },
            quantity: item.quantity,
        }
    }
}

/// Build the request body for create/update calls.
pub(crate) fn order_payload(items: &[OrderItem]) -> Vec<OrderItemPayload> {
    items.iter().map(OrderItemPayload::from).collect()
}

/// Credentials sent to `/signin`.
#[derive(Debug, Serialize)]
pub(crate) struct SignInPayload<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// The API encodes empty lists as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATE_RESPONSE: &str = r#"{"id":4,"items":[{"coffee":{"id":1,"name":"Packer Spiced Latte","teaser":"Packed with goodness to spice up your images","description":"","price":350,"image":"/packer.png","ingredients":null},"quantity":4},{"coffee":{"id":3,"name":"Nomadicano","teaser":"Drink one today and you will want to schedule another","description":"","price":150,"image":"/nomad.png","ingredients":null},"quantity":3}]}"#;

    #[test]
    fn test_decode_order_response() {
        let order: Order = serde_json::from_str(CREATE_RESPONSE).unwrap();
        assert_eq!(order.id, 4);
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].coffee.name, "Packer Spiced Latte");
        assert_eq!(order.items[1].coffee.price, 150);
        assert!(order.items[0].coffee.ingredients.is_empty());
    }

    #[test]
    fn test_decode_order_null_items() {
        let order: Order = serde_json::from_str(r#"{"id":9,"items":null}"#).unwrap();
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_payload_only_sends_coffee_id() {
        let mut item = OrderItem::new(1, 4);
        item.coffee.name = "ignored".to_string();

        let body = serde_json::to_string(&order_payload(&[item])).unwrap();
        assert_eq!(body, r#"[{"coffee":{"id":1},"quantity":4}]"#);
    }

    #[test]
    fn test_decode_auth_response() {
        let auth: AuthResponse =
            serde_json::from_str(r#"{"UserID":1,"Username":"education","token":"abc"}"#).unwrap();
        assert_eq!(auth.user_id, 1);
        assert_eq!(auth.token, "abc");
    }
}
