//! Path resolution for the provider's configuration
//!
//! # Environment Variables
//!
//! - `HASHICUPS_CONFIG_DIR` - Override config directory (e.g., `~/dotfiles/hashicups`)
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `HASHICUPS_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/hashicups` (if set)
//! 3. Platform default:
//!    - Windows: `%APPDATA%\hashicups`
//!    - macOS/Linux: `~/.config/hashicups`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "HASHICUPS_CONFIG_DIR";

/// Default state file, relative to the working directory
pub const DEFAULT_STATE_FILE: &str = "hashicups.state.json";

/// Get the provider config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("hashicups");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            let path = app_data.join("hashicups");
            log::debug!("Using Windows config dir: {}", path.display());
            return Ok(path);
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("hashicups");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Path of the provider config file
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join("provider.toml"))
}

/// Resolve the state file path, defaulting to the working directory
pub fn state_file(explicit: Option<&str>) -> PathBuf {
    explicit.map_or_else(|| PathBuf::from(DEFAULT_STATE_FILE), expand)
}

/// Expand ~ and environment variables in a path string.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// Helper to run a test with temporary env var
    ///
    /// # Safety
    /// This function uses unsafe env::set_var/remove_var which can cause issues
    /// if other threads read environment variables concurrently.
    /// Only use in single-threaded test contexts.
    fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: Tests run in isolation and don't read env vars concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: Tests run in isolation
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        with_env_var(ENV_CONFIG_DIR, "/custom/hashicups/path", || {
            let result = config_dir().unwrap();
            assert_eq!(result, PathBuf::from("/custom/hashicups/path"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/hashicups/path/provider.toml")
            );
        });
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let home = dirs::home_dir().unwrap();
        let expected = home.join("dotfiles").join("hashicups-tilde-test");
        with_env_var(ENV_CONFIG_DIR, "~/dotfiles/hashicups-tilde-test", || {
            let result = config_dir().unwrap();
            assert_eq!(result, expected);
        });
    }

    #[test]
    fn test_state_file_default_and_explicit() {
        assert_eq!(state_file(None), PathBuf::from("hashicups.state.json"));
        assert_eq!(
            state_file(Some("/tmp/orders.json")),
            PathBuf::from("/tmp/orders.json")
        );
    }

    #[test]
    fn test_expand_with_tilde() {
        let result = expand("~/test/path");
        let home = dirs::home_dir().unwrap();
        assert_eq!(result, home.join("test").join("path"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_VAR_12345/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_VAR_12345/file"));
    }
}
