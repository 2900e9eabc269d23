//! Configuration loaded from `condsql.toml`.
//!
//! ```toml
//! dialect = "mysql"
//!
//! [cache]
//! enabled = true
//! ttl_secs = 600
//! sweep_interval_secs = 60
//! max_entries = 10000
//! min_hits = 2
//! evict_batch = 256
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::{CondError, CondResult};
use crate::transpiler::Dialect;

/// File name looked up in the working directory.
pub const CONFIG_FILE: &str = "condsql.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default dialect name, see [`Dialect`]'s `FromStr`.
    pub dialect: String,
    pub cache: CacheSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default().name().to_string(),
            cache: CacheSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    /// 0 disables expiry.
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
    pub max_entries: usize,
    pub min_hits: u64,
    pub evict_batch: usize,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 600,
            sweep_interval_secs: 60,
            max_entries: 10_000,
            min_hits: 2,
            evict_batch: 256,
        }
    }
}

impl Config {
    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> CondResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| CondError::Config(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> CondResult<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| CondError::Config(e.to_string()))?;
        // Surface a bad dialect at load time rather than at first compile.
        config.dialect()?;
        Ok(config)
    }

    /// Load from the first config file found, or fall back to defaults.
    pub fn discover() -> CondResult<Self> {
        match Self::search_paths().into_iter().find(|p| p.exists()) {
            Some(path) => Self::load(path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `./condsql.toml`, then `<config dir>/condsql/config.toml`.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("condsql").join("config.toml"));
        }
        paths
    }

    pub fn dialect(&self) -> CondResult<Dialect> {
        self.dialect.parse()
    }

    pub fn cache_config(&self) -> CacheConfig {
        let c = &self.cache;
        CacheConfig {
            enabled: c.enabled,
            ttl: (c.ttl_secs > 0).then(|| Duration::from_secs(c.ttl_secs)),
            sweep_interval: Duration::from_secs(c.sweep_interval_secs),
            max_entries: c.max_entries,
            min_hits: c.min_hits,
            evict_batch: c.evict_batch,
        }
    }

    pub fn to_toml(&self) -> CondResult<String> {
        toml::to_string_pretty(self).map_err(|e| CondError::Config(e.to_string()))
    }
}
