//! Provider configuration
//!
//! Resolved once at startup, in increasing priority:
//! 1. built-in defaults
//! 2. `<config_dir>/provider.toml`
//! 3. command-line flags (which fall back to `HASHICUPS_*` env vars)

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::paths;

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    /// API base URL
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            host: hashicups_client::backend::http::DEFAULT_HOST.to_string(),
            username: None,
            password: None,
            timeout_secs: hashicups_client::backend::http::DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl ProviderConfig {
    /// Load the config file if present, then apply overrides
    pub fn resolve(overrides: Overrides) -> Result<Self> {
        let path = paths::config_file()?;
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };
        Ok(config.with_overrides(overrides))
    }

    /// Load from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if config.timeout_secs == 0 {
            bail!(
                "Invalid config file: {}: timeout_secs must be at least 1",
                path.display()
            );
        }
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if overrides.username.is_some() {
            self.username = overrides.username;
        }
        if overrides.password.is_some() {
            self.password = overrides.password;
        }
        self
    }

    /// Username and password, only when both are non-empty
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some((user, pass)),
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ProviderConfig::default();
        assert_eq!(config.host, "http://localhost:19090");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.toml");
        fs::write(
            &path,
            "host = \"http://cups.internal:9090\"\nusername = \"education\"\npassword = \"test123\"\n",
        )
        .unwrap();

        let config = ProviderConfig::load_from(&path).unwrap();
        assert_eq!(config.host, "http://cups.internal:9090");
        assert_eq!(config.credentials(), Some(("education", "test123")));
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_load_invalid_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.toml");
        fs::write(&path, "host = [").unwrap();
        assert!(ProviderConfig::load_from(&path).is_err());
    }

    #[test]
    fn test_load_rejects_zero_timeout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("provider.toml");
        fs::write(&path, "timeout_secs = 0\n").unwrap();

        let err = ProviderConfig::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("timeout_secs must be at least 1"));
    }

    #[test]
    fn test_overrides_win() {
        let config = ProviderConfig {
            username: Some("file-user".to_string()),
            ..Default::default()
        }
        .with_overrides(Overrides {
            host: Some("http://override:1".to_string()),
            username: None,
            password: Some("secret".to_string()),
        });

        assert_eq!(config.host, "http://override:1");
        assert_eq!(config.credentials(), Some(("file-user", "secret")));
    }

    #[test]
    fn test_empty_credentials_ignored() {
        let config = ProviderConfig {
            username: Some("education".to_string()),
            password: Some(String::new()),
            ..Default::default()
        };
        assert!(config.credentials().is_none());
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ProviderConfig {
            password: Some("hunter2".to_string()),
            ..Default::default()
        };
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
