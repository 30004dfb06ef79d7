//! Errors surfaced by resolution.

use std::sync::Arc;
use thiserror::Error;

/// Error type returned by provider queries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving a key across providers.
///
/// Every variant is surfaced to the caller as-is. Nothing is retried and no fallback value
/// is ever substituted.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ResolveError {
    /// The provider (or answer) collection was empty.
    #[error("No providers to resolve against")]
    NoProviders,

    /// A provider's query failed. Carries the first failure observed during fan-out.
    #[error("Provider query failed ({provider})")]
    ProviderQuery {
        provider: Arc<str>,
        #[source]
        source: BoxError,
    },

    /// Two or more answer groups share the maximum total weight.
    ///
    /// `representatives` holds the debug rendering of each tied group's value, in
    /// first-seen order.
    #[error("Consensus tie: {tied} answer groups share the maximum weight {weight}")]
    ConsensusTie { weight: u64, tied: usize, representatives: Vec<String> },

    /// Selection ran over zero groups. Unreachable through the public entry points.
    #[error("No answer groups to select a winner from")]
    NoAnswerGroups,

    /// The configured fan-out deadline elapsed before every provider answered.
    #[error("Provider queries timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

impl ResolveError {
    #[must_use]
    pub fn is_tie(&self) -> bool {
        matches!(self, Self::ConsensusTie { .. })
    }

    /// Returns `true` if a provider failed or did not answer in time.
    #[must_use]
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::ProviderQuery { .. } | Self::Timeout { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_provider_query_keeps_source() {
        let err = ResolveError::ProviderQuery {
            provider: Arc::from("mirror"),
            source: "connection reset".into(),
        };

        assert_eq!(err.to_string(), "Provider query failed (mirror)");
        assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("connection reset"));
        assert!(err.is_provider_failure());
        assert!(!err.is_tie());
    }

    #[test]
    fn test_tie_display() {
        let err = ResolveError::ConsensusTie {
            weight: 5,
            tied: 2,
            representatives: vec!["Some(\"x\")".into(), "Some(\"y\")".into()],
        };

        assert_eq!(err.to_string(), "Consensus tie: 2 answer groups share the maximum weight 5");
        assert!(err.is_tie());
    }
}
