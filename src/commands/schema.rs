use anyhow::{Result, bail};
use colored::Colorize;
use declarative::{AttrType, Attribute, Schema};

use crate::provider::Provider;
use crate::ui;

/// Print resource and data source schemas
pub fn run(provider: &Provider, type_name: Option<&str>) -> Result<()> {
    let wanted = |name: &str| type_name.is_none_or(|t| t == name);
    let mut shown = 0;

    for resource in provider.resources() {
        if wanted(resource.type_name()) {
            ui::section(&format!("resource {}", resource.type_name()));
            print_schema(&resource.schema(), 1);
            shown += 1;
        }
    }
    for source in provider.data_sources() {
        if wanted(source.type_name()) {
            ui::section(&format!("data source {}", source.type_name()));
            print_schema(&source.schema(), 1);
            shown += 1;
        }
    }

    if shown == 0 {
        if let Some(name) = type_name {
            bail!("Unknown type '{}'", name);
        }
    }
    Ok(())
}

fn print_schema(schema: &Schema, depth: usize) {
    let indent = "  ".repeat(depth);
    for (name, attribute) in schema.iter() {
        let description = if attribute.description.is_empty() {
            String::new()
        } else {
            format!(" {}", attribute.description.dimmed())
        };
        println!(
            "{}{} {}{}",
            indent,
            name.bold(),
            format!("({})", describe(attribute)).dimmed(),
            description
        );
        if let AttrType::List(nested) = &attribute.ty {
            print_schema(nested, depth + 1);
        }
    }
}

/// Short type and mode label, e.g. `list, max 1, required`
fn describe(attribute: &Attribute) -> String {
    let ty = match &attribute.ty {
        AttrType::Bool => "bool",
        AttrType::Int => "number",
        AttrType::String => "string",
        AttrType::List(_) => "list",
    };
    let mut parts = vec![ty.to_string()];
    if let Some(max) = attribute.max_items {
        parts.push(format!("max {}", max));
    }
    parts.push(attribute.mode.to_string());
    parts.join(", ")
}
