//! Configuration management for the tiered cache engine.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Configuration file support (`CONFIG_PATH`)
//! - Environment variable overrides (`TIER__` prefix)
//! - Component-wise validation
mod cache;
mod channel;
mod monitoring;
mod runtime;
mod store;
mod sweep;
pub use cache::*;
pub use channel::*;
pub use monitoring::*;
pub use runtime::*;
pub use store::*;
pub use sweep::*;
#[cfg(test)]
mod config_test;

use std::env;
use std::fmt::Debug;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

const ENV_PREFIX: &str = "TIER";

/// Main configuration container for the memory hierarchy
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Serialize, Deserialize, Clone)]
pub struct TierConfig {
    /// Volatile tier
    #[serde(default)]
    pub cache: CacheConfig,
    /// Durable slotted tier
    #[serde(default)]
    pub store: StoreConfig,
    /// Channels tracked through all tiers
    #[serde(default = "channel::default_channels")]
    pub channels: Vec<ChannelConfig>,
    /// Foreground/background loop cadence and logging
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Metrics export
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// TTL evaluation harness
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl Default for TierConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            store: StoreConfig::default(),
            channels: channel::default_channels(),
            runtime: RuntimeConfig::default(),
            monitoring: MonitoringConfig::default(),
            sweep: SweepConfig::default(),
        }
    }
}

impl Debug for TierConfig {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("TierConfig")
            .field("cache", &self.cache)
            .field("store", &self.store)
            .field("channels", &self.channels.len())
            .finish()
    }
}

impl TierConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `TIER__` prefix (highest priority)
    ///
    /// # Note
    /// This method does NOT validate the configuration. Callers MUST call `validate()`
    /// after all overrides are applied.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("TIER__CACHE__CAPACITY", "3");
    /// let cfg = TierConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.cache.validate()?;
        self.store.validate()?;
        channel::validate_channels(&self.channels, &self.store)?;
        self.runtime.validate()?;
        self.monitoring.validate()?;
        self.sweep.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
