use anyhow::{Context as AnyhowContext, Result};
use colored::Colorize;
use declarative::{Attributes, Value};

use crate::data_source::{coffees as coffees_source, order as order_source};
use crate::provider::Provider;
use crate::ui;

/// List the coffee catalog
pub fn coffees(provider: &Provider, json: bool) -> Result<()> {
    let data = provider
        .read_data_source(coffees_source::TYPE_NAME, Attributes::new())
        .context("Failed to read the coffee catalog")?;
    let attrs = data.state();

    if json {
        return print_json(&attrs);
    }

    let list = list_of(&attrs, "coffees");
    ui::header(&format!("Coffees ({})", list.len()));
    for coffee in list {
        println!();
        println!(
            "  {} {}",
            field(coffee, "id").dimmed(),
            field(coffee, "name").bold()
        );
        ui::kv("teaser", &field(coffee, "teaser"));
        ui::kv("price", &field(coffee, "price"));
        let ingredients: Vec<String> = coffee
            .lookup("ingredients")
            .and_then(Value::as_list)
            .unwrap_or_default()
            .iter()
            .map(|i| field(i, "ingredient_id"))
            .collect();
        if !ingredients.is_empty() {
            ui::kv("ingredients", &ingredients.join(", "));
        }
    }
    Ok(())
}

/// Show one order
pub fn order(provider: &Provider, id: i64, json: bool) -> Result<()> {
    let mut args = Attributes::new();
    args.insert("id".to_string(), Value::from(id));

    let data = provider
        .read_data_source(order_source::TYPE_NAME, args)
        .with_context(|| format!("Failed to read order {}", id))?;
    let attrs = data.state();

    if json {
        return print_json(&attrs);
    }

    let items = list_of(&attrs, "items");
    ui::header(&format!("Order {}", id));
    if items.is_empty() {
        ui::dim("(no items)");
    }
    for item in items {
        println!(
            "  {} x {} {}",
            field(item, "quantity").bold(),
            field(item, "coffee_name"),
            format!("(#{})", field(item, "coffee_id")).dimmed()
        );
    }
    Ok(())
}

fn print_json(attrs: &Attributes) -> Result<()> {
    let text = serde_json::to_string_pretty(attrs).context("Failed to serialize attributes")?;
    println!("{}", text);
    Ok(())
}

fn list_of<'a>(attrs: &'a Attributes, name: &str) -> &'a [Value] {
    attrs
        .get(name)
        .and_then(Value::as_list)
        .unwrap_or_default()
}

fn field(value: &Value, name: &str) -> String {
    match value.lookup(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Int(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_formats_scalars() {
        let coffee = Value::object([
            ("id", Value::from(3)),
            ("name", Value::from("Nomadicano")),
        ]);
        assert_eq!(field(&coffee, "id"), "3");
        assert_eq!(field(&coffee, "name"), "Nomadicano");
        assert_eq!(field(&coffee, "teaser"), "-");
    }

    #[test]
    fn test_list_of_missing() {
        assert!(list_of(&Attributes::new(), "coffees").is_empty());
    }
}
