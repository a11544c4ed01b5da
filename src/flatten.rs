//! Translation between typed API records and schema-shaped attribute trees
//!
//! The schema models a single nested coffee as a one-element list, so an
//! order item is `{ quantity, coffee: [ { id, name, ... } ] }` on the
//! declarative side and `{ quantity, coffee: { id, ... } }` on the wire.
//! All functions keep items index-for-index.

use crate::error::{Error, Result};
use declarative::Value;
use hashicups_client::{Coffee, OrderItem};

/// Build API order items from the flattened `items` list
///
/// Only `quantity` and `coffee.0.id` are read; the computed coffee fields are
/// ignored.
pub fn expand_order_items(flat: &[Value]) -> Result<Vec<OrderItem>> {
    flat.iter()
        .enumerate()
        .map(|(i, item)| expand_order_item(i, item))
        .collect()
}

fn expand_order_item(index: usize, item: &Value) -> Result<OrderItem> {
    let path = format!("items.{}", index);
    let block = item
        .as_object()
        .ok_or_else(|| Error::contract(&path, format!("expected an object, found {}", item.kind())))?;

    let quantity = block
        .get("quantity")
        .and_then(Value::as_int)
        .ok_or_else(|| Error::contract(format!("{}.quantity", path), "expected a number"))?;

    let coffee = block
        .get("coffee")
        .and_then(Value::as_list)
        .ok_or_else(|| Error::contract(format!("{}.coffee", path), "expected a list"))?;
    if coffee.len() != 1 {
        return Err(Error::contract(
            format!("{}.coffee", path),
            format!("expected exactly one element, found {}", coffee.len()),
        ));
    }

    let coffee_id = coffee[0]
        .lookup("id")
        .and_then(Value::as_int)
        .ok_or_else(|| Error::contract(format!("{}.coffee.0.id", path), "expected a number"))?;

    Ok(OrderItem::new(coffee_id, quantity))
}

/// Flatten API order items into the resource's `items` shape
pub fn flatten_order_items(items: Option<&[OrderItem]>) -> Vec<Value> {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| {
            Value::object([
                ("coffee", Value::List(flatten_coffee(&item.coffee))),
                ("quantity", Value::from(item.quantity)),
            ])
        })
        .collect()
}

/// Flatten a coffee into a one-element list
pub fn flatten_coffee(coffee: &Coffee) -> Vec<Value> {
    vec![Value::object([
        ("id", Value::from(coffee.id)),
        ("name", Value::from(coffee.name.as_str())),
        ("teaser", Value::from(coffee.teaser.as_str())),
        ("description", Value::from(coffee.description.as_str())),
        ("price", Value::from(coffee.price)),
        ("image", Value::from(coffee.image.as_str())),
    ])]
}

/// Flatten API order items into the `hashicups_order` data source shape
///
/// Coffee fields are lifted onto the item (`coffee_id`, `coffee_name`, ...).
pub fn flatten_order_items_data(items: Option<&[OrderItem]>) -> Vec<Value> {
    items
        .unwrap_or_default()
        .iter()
        .map(|item| {
            let coffee = &item.coffee;
            Value::object([
                ("coffee_id", Value::from(coffee.id)),
                ("coffee_name", Value::from(coffee.name.as_str())),
                ("coffee_teaser", Value::from(coffee.teaser.as_str())),
                ("coffee_description", Value::from(coffee.description.as_str())),
                ("coffee_price", Value::from(coffee.price)),
                ("coffee_image", Value::from(coffee.image.as_str())),
                ("quantity", Value::from(item.quantity)),
            ])
        })
        .collect()
}

/// Flatten the catalog into the `hashicups_coffees` shape
pub fn flatten_coffees(coffees: &[Coffee]) -> Vec<Value> {
    coffees
        .iter()
        .map(|coffee| {
            let ingredients = coffee
                .ingredients
                .iter()
                .map(|i| Value::object([("ingredient_id", Value::from(i.ingredient_id))]))
                .collect();
            Value::object([
                ("id", Value::from(coffee.id)),
                ("name", Value::from(coffee.name.as_str())),
                ("teaser", Value::from(coffee.teaser.as_str())),
                ("description", Value::from(coffee.description.as_str())),
                ("price", Value::from(coffee.price)),
                ("image", Value::from(coffee.image.as_str())),
                ("ingredients", Value::List(ingredients)),
            ])
        })
        .collect()
}
