//! Desired configuration files
//!
//! A desired configuration names each instance by a short type key and a
//! local name:
//!
//! ```toml
//! [order.morning]
//! items = [
//!   { coffee = { id = 1 }, quantity = 4 },
//! ]
//! ```
//!
//! Full type names (`hashicups_order`) are accepted as keys too. JSON files
//! use the same shape.

use anyhow::{Context, Result, bail};
use declarative::{Attributes, address};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const TYPE_PREFIX: &str = "hashicups_";

/// Raw file shape: type key -> local name -> attributes
type RawDesired = BTreeMap<String, BTreeMap<String, Attributes>>;

/// Load a desired configuration, keyed by instance address
pub fn load(path: &Path) -> Result<BTreeMap<String, Attributes>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Could not read desired config: {}", path.display()))?;

    let raw: RawDesired = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", path.display()))?,
        Some("toml") | None => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML in {}", path.display()))?,
        Some(other) => bail!(
            "Unsupported desired config format '.{}' (expected .toml or .json)",
            other
        ),
    };

    let desired = to_addresses(raw)?;
    log::debug!(
        "Loaded {} desired instance(s) from {}",
        desired.len(),
        path.display()
    );
    Ok(desired)
}

/// Expand a short type key (`order`) to its full type name
pub fn type_name(key: &str) -> String {
    if key.starts_with(TYPE_PREFIX) {
        key.to_string()
    } else {
        format!("{TYPE_PREFIX}{key}")
    }
}

fn to_addresses(raw: RawDesired) -> Result<BTreeMap<String, Attributes>> {
    let mut desired = BTreeMap::new();
    for (key, instances) in raw {
        let type_name = type_name(&key);
        for (name, attrs) in instances {
            if name.is_empty() || name.contains('.') {
                bail!("Invalid instance name '{}' under '{}'", name, key);
            }
            let address = address(&type_name, &name);
            if desired.insert(address.clone(), attrs).is_some() {
                bail!("Instance '{}' is declared more than once", address);
            }
        }
    }
    Ok(desired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::Value;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_type_name() {
        assert_eq!(type_name("order"), "hashicups_order");
        assert_eq!(type_name("hashicups_order"), "hashicups_order");
    }

    #[test]
    fn test_load_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cups.toml",
            r#"
[order.morning]
items = [
  { coffee = { id = 1 }, quantity = 4 },
  { coffee = { id = 3 }, quantity = 3 },
]
"#,
        );

        let desired = load(&path).unwrap();
        let attrs = &desired["hashicups_order.morning"];
        assert_eq!(
            attrs.get("items").and_then(|v| v.lookup("1.quantity")),
            Some(&Value::Int(3))
        );
        assert_eq!(
            attrs.get("items").and_then(|v| v.lookup("0.coffee.id")),
            Some(&Value::Int(1))
        );
    }

    #[test]
    fn test_load_json_with_full_type_name() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "cups.json",
            r#"{"hashicups_order": {"edu": {"items": [{"coffee": [{"id": 2}], "quantity": 1}]}}}"#,
        );

        let desired = load(&path).unwrap();
        assert_eq!(desired.len(), 1);
        assert!(desired.contains_key("hashicups_order.edu"));
    }

    #[test]
    fn test_duplicate_instance_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "dup.json",
            r#"{"order": {"a": {}}, "hashicups_order": {"a": {}}}"#,
        );

        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cups.yaml", "order: {}");
        assert!(load(&path).is_err());
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "cups.toml", "[order.morning\n");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid TOML"));
    }
}
