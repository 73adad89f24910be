//! Configuration document for the watcher
//!
//! The document is re-read on every watch cycle and may be edited externally
//! at any time, so loading is lenient: anything missing or malformed falls
//! back to an empty value rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::chain::Chain;

/// Process-wide configuration, one fresh copy per watch cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bch_base: String,
    pub xec_base: String,
    pub btc_base: String,
    pub dbg_base: String,
    pub proxy_token: String,
    pub discord_webhook: String,
}

impl Config {
    /// Build a configuration from an arbitrary JSON value.
    ///
    /// Unknown keys are ignored, `null` counts as absent and non-string
    /// scalars are stringified. A non-object value yields the defaults.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        let field = |key: &str| match obj.get(key) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.trim().to_string(),
            Some(other) => other.to_string().trim().to_string(),
        };

        Self {
            bch_base: field("bch_base"),
            xec_base: field("xec_base"),
            btc_base: field("btc_base"),
            dbg_base: field("dbg_base"),
            proxy_token: field("proxy_token"),
            discord_webhook: field("discord_webhook"),
        }
        .normalized()
    }

    /// Trim every field and strip trailing slashes from the base URLs
    pub fn normalized(self) -> Self {
        let base = |s: String| s.trim().trim_end_matches('/').to_string();
        Self {
            bch_base: base(self.bch_base),
            xec_base: base(self.xec_base),
            btc_base: base(self.btc_base),
            dbg_base: base(self.dbg_base),
            proxy_token: self.proxy_token.trim().to_string(),
            discord_webhook: self.discord_webhook.trim().to_string(),
        }
    }

    /// Base URL configured for a chain; empty means the chain is disabled
    pub fn base_url(&self, chain: Chain) -> &str {
        match chain {
            Chain::Bch => &self.bch_base,
            Chain::Xec => &self.xec_base,
            Chain::Btc => &self.btc_base,
            Chain::Dbg => &self.dbg_base,
        }
    }

    /// Chains with a non-empty base URL
    pub fn enabled_chains(&self) -> Vec<Chain> {
        Chain::ALL
            .into_iter()
            .filter(|c| !self.base_url(*c).is_empty())
            .collect()
    }
}

/// Source of a fresh configuration for every watch cycle
pub trait ConfigProvider: Send + Sync + std::fmt::Debug {
    fn load(&self) -> Config;
}

/// A fixed configuration is its own provider
impl ConfigProvider for Config {
    fn load(&self) -> Config {
        self.clone()
    }
}

/// Reads the configuration document from disk on every call
#[derive(Debug, Clone)]
pub struct FileConfigProvider {
    path: PathBuf,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn load(&self) -> Config {
        load_config(&self.path)
    }
}

/// Load configuration from a JSON file, substituting defaults on any failure
pub fn load_config(path: &Path) -> Config {
    match try_load_config(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::debug!("Using default configuration: {}", e);
            Config::default()
        }
    }
}

fn try_load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::WatcherError::ConfigurationUnavailable(format!(
            "Failed to read config file {:?}: {}",
            path, e
        ))
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|e| {
        crate::WatcherError::ConfigurationUnavailable(format!(
            "Failed to parse config file {:?}: {}",
            path, e
        ))
    })?;
    Ok(Config::from_value(&value))
}

/// Write the configuration document, creating its directory if needed
pub fn save_config(path: &Path, config: &Config) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(config)?;
    crate::history::write_atomic(path, &json)?;
    tracing::debug!("Saved configuration to {:?}", path);
    Ok(())
}
