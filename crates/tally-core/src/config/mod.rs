//! Application configuration with layered loading.
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded in this order (later overrides earlier):
//!
//! 1. **Compiled defaults**: Hardcoded in struct `Default` implementations
//! 2. **Config file**: TOML file specified by `TALLY_CONFIG` env var
//! 3. **Environment variables**: `TALLY__*` env vars override specific fields
//!
//! # Configuration Sections
//!
//! - [`ResolverConfig`]: Fan-out deadline and ignored JSON fields
//! - [`ProviderConfig`]: Static providers with weights and answer tables
//! - [`LoggingConfig`]: Log level and format
//!
//! # Example
//!
//! ```toml
//! [resolver]
//! query_timeout_ms = 2000
//! ignore_fields = ["meta.fetchedAt"]
//!
//! [[providers]]
//! name = "primary"
//! weight = 3
//! answers = { user = { id = 7, name = "ada" } }
//!
//! [[providers]]
//! name = "mirror"
//! answers = { user = { id = 7, name = "ada" } }
//! ```

use crate::resolver::{
    InvalidWeight, JsonComparator, Resolver, ResolverConfig, StaticProvider, Weight,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::{HashMap, HashSet},
    path::Path,
};

/// A provider answering from a fixed table of JSON values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Identifier used to attribute answers and failures. Must be unique.
    pub name: String,

    /// Voting weight. Must be greater than 0. Defaults to `1`.
    #[serde(default = "default_weight")]
    pub weight: u32,

    /// Answers by key. Keys missing from the table resolve to an absent answer.
    #[serde(default)]
    pub answers: HashMap<String, Value>,

    /// When set, every query to this provider fails with this message.
    #[serde(default)]
    pub fail_with: Option<String>,
}

fn default_weight() -> u32 {
    1
}

impl ProviderConfig {
    /// Builds the in-memory provider described by this entry.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`] if `weight` is zero.
    pub fn build(&self) -> Result<StaticProvider<String, Value>, InvalidWeight> {
        let weight = Weight::new(self.weight)?;
        let provider = match &self.fail_with {
            Some(message) => StaticProvider::failing(self.name.as_str(), weight, message.as_str()),
            None => StaticProvider::new(self.name.as_str(), weight),
        };
        Ok(provider.with_answers(self.answers.clone()))
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (e.g., "trace", "debug", "info", "warn", "error"). Defaults to `"info"`.
    pub level: String,

    /// Output format: `"json"` or `"pretty"`. Defaults to `"pretty"`.
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "pretty".to_string() }
    }
}

/// Root application configuration.
///
/// Loaded with the `TALLY` prefix for environment overrides using `__` as a separator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Resolver behavior.
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Providers voting on every resolution.
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
}

impl AppConfig {
    /// Loads configuration from a TOML file with environment variable overrides.
    ///
    /// A missing file is not an error; the defaults apply. Use `__` as a separator for
    /// nested fields (e.g., `TALLY__RESOLVER__QUERY_TIMEOUT_MS=500`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be parsed or deserialized.
    pub fn from_file<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name(&config_path.as_ref().to_string_lossy()).required(false))
            .add_source(Environment::with_prefix("TALLY").separator("__"))
            .build()?;

        config_builder.try_deserialize()
    }

    /// Loads configuration from `config/config.toml` with fallback to defaults.
    ///
    /// The config file path can be overridden using the `TALLY_CONFIG` environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration cannot be loaded or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var("TALLY_CONFIG").unwrap_or_else(|_| "config/config.toml".to_string());
        Self::from_file(&config_path)
    }

    /// Validates the configuration.
    ///
    /// Checks that:
    /// - Provider names are non-empty and unique
    /// - Provider weights are greater than zero
    /// - Resolver settings are valid
    /// - Logging format is either `"json"` or `"pretty"`
    ///
    /// # Errors
    ///
    /// Returns a descriptive error string if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err("Provider name cannot be empty".to_string());
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(format!("Duplicate provider name: {}", provider.name));
            }
            if provider.weight == 0 {
                return Err(format!(
                    "Weight must be greater than 0 for provider: {}",
                    provider.name
                ));
            }
        }

        self.resolver.validate()?;

        if !["json", "pretty"].contains(&self.logging.format.as_str()) {
            return Err("Logging format must be 'json' or 'pretty'".to_string());
        }

        Ok(())
    }

    /// Builds every configured provider in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`] for the first provider with a zero weight.
    pub fn build_providers(&self) -> Result<Vec<StaticProvider<String, Value>>, InvalidWeight> {
        self.providers.iter().map(ProviderConfig::build).collect()
    }

    /// Returns a JSON resolver honoring the `resolver` section.
    #[must_use]
    pub fn build_resolver(&self) -> Resolver<JsonComparator> {
        Resolver::json(self.resolver.clone())
    }
}
