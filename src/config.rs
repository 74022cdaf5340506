//! Deployment settings for listen-check.
//!
//! Settings live in an optional TOML file:
//!
//! ```toml
//! family = "ipv6"
//! table_path = "/proc/net/tcp6"
//! ```
//!
//! Anything not set falls back to the build-time defaults.

use std::fs;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{ConfigError, Result};
use crate::family::{AddressFamily, Family};
use crate::matcher::PortMatcher;

/// Table path baked in at compile time, if any.
const BUILD_TABLE_PATH: Option<&str> = option_env!("LISTEN_CHECK_TABLE_PATH");

/// Settings as read from the config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Address family of the socket table.
    #[serde(default)]
    pub family: Family,

    /// Socket table to read; defaults to the family's kernel table.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

impl Settings {
    /// The strategy for the configured family.
    pub fn address_family(&self) -> &'static dyn AddressFamily {
        self.family.strategy()
    }

    /// Resolves the table path: config file, then build-time override,
    /// then the family's kernel table.
    pub fn table_path(&self) -> PathBuf {
        self.table_path
            .clone()
            .or_else(|| BUILD_TABLE_PATH.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(self.address_family().default_table_path()))
    }

    /// Builds the matcher these settings describe.
    pub fn matcher(&self) -> PortMatcher {
        PortMatcher::new(self.table_path(), self.address_family())
    }
}

/// Returns the path to the settings file.
///
/// Respects the `LISTEN_CHECK_CONFIG` environment variable if set,
/// otherwise uses the system config directory.
pub fn settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("LISTEN_CHECK_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("listen-check").join("config.toml"))
}

/// Loads settings from disk; a missing file means defaults.
pub fn load_settings() -> Result<Settings> {
    match settings_path() {
        Some(path) if path.exists() => {
            let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadFailed {
                path: path.clone(),
                source,
            })?;
            let settings = parse_settings(&content)
                .map_err(|source| ConfigError::ParseFailed { path, source })?;
            Ok(settings)
        }
        _ => Ok(Settings::default()),
    }
}

fn parse_settings(content: &str) -> std::result::Result<Settings, toml::de::Error> {
    toml::from_str(content)
}
