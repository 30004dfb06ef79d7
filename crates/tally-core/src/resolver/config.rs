//! Resolver configuration types and defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for a [`Resolver`](super::Resolver).
///
/// The defaults reproduce the plain resolution behavior: no deadline on the fan-out and
/// no ignored fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Deadline in milliseconds for the whole fan-out (default: none).
    ///
    /// Without a deadline a hung provider hangs the resolution. When set, elapsed
    /// deadlines fail the resolution with `Timeout` and outstanding queries are dropped.
    #[serde(default)]
    pub query_timeout_ms: Option<u64>,

    /// Field paths ignored when comparing JSON answers.
    ///
    /// Supports dot notation (`"meta.updatedAt"`) and wildcards (`"items.*.etag"`).
    /// Only consulted by [`JsonComparator`](super::JsonComparator).
    ///
    /// ```toml
    /// [resolver]
    /// ignore_fields = ["timestamp", "items.*.etag"]
    /// ```
    #[serde(default)]
    pub ignore_fields: Vec<String>,
}

impl ResolverConfig {
    /// Returns the fan-out deadline, if one is configured.
    #[must_use]
    pub fn query_timeout(&self) -> Option<Duration> {
        self.query_timeout_ms.map(Duration::from_millis)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid setting.
    pub fn validate(&self) -> Result<(), String> {
        if self.query_timeout_ms == Some(0) {
            return Err("query_timeout_ms must be greater than 0 when set".to_string());
        }
        if let Some(path) = self.ignore_fields.iter().find(|p| p.is_empty() || p.contains("..")) {
            return Err(format!("Invalid ignore field path: {path:?}"));
        }
        Ok(())
    }
}
