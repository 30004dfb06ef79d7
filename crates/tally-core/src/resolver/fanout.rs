//! Concurrent fan-out of one key to every provider.
//!
//! Every query is launched at once and drained in completion order. A failure does not
//! cancel the queries still in flight: the drain continues until every provider has
//! finished, and only then is the first observed failure reported. Later failures are
//! logged and discarded. When a deadline is set and elapses, a failure already observed
//! still takes precedence over `Timeout`.

use super::{errors::ResolveError, provider::Provider, types::WeightedAnswer};
use futures_util::stream::{FuturesUnordered, StreamExt};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Queries every provider for `key` concurrently and collects their weighted answers.
///
/// Answers are returned in arrival order, one per provider, each attributed to the
/// provider's name.
///
/// # Errors
///
/// - `NoProviders` if `providers` is empty; no query is issued
/// - `ProviderQuery` with the first failure observed, once all queries have finished or
///   the deadline has elapsed
/// - `Timeout` if `timeout` is set and elapses before any failure was observed;
///   outstanding queries are dropped
pub async fn query_providers<K, V, P>(
    providers: &[P],
    key: &K,
    timeout: Option<Duration>,
) -> Result<Vec<WeightedAnswer<V>>, ResolveError>
where
    K: ?Sized + Sync,
    V: Send,
    P: Provider<K, V>,
{
    if providers.is_empty() {
        return Err(ResolveError::NoProviders);
    }

    debug!(provider_count = providers.len(), "querying providers");

    let deadline = timeout.map(|limit| Instant::now() + limit);

    let mut pending: FuturesUnordered<_> = providers
        .iter()
        .map(|provider| async move {
            let outcome = provider.query(key).await;
            (provider.name(), provider.weight(), outcome)
        })
        .collect();

    let mut answers = Vec::with_capacity(providers.len());
    let mut first_failure = None;

    loop {
        let step = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, pending.next()).await,
            None => Ok(pending.next().await),
        };

        let next = match step {
            Ok(next) => next,
            Err(_) => {
                let timeout_ms =
                    timeout.map_or(u64::MAX, |t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX));
                warn!(
                    timeout_ms,
                    outstanding = pending.len(),
                    failed = first_failure.is_some(),
                    "provider queries timed out"
                );
                return Err(first_failure.unwrap_or(ResolveError::Timeout { timeout_ms }));
            }
        };

        let Some((name, weight, outcome)) = next else {
            break;
        };

        match outcome {
            Ok(value) => {
                debug!(
                    provider = %name,
                    weight = weight.get(),
                    has_value = value.is_some(),
                    "provider answered"
                );
                answers.push(WeightedAnswer::new(value, weight).with_provider(name));
            }
            Err(source) => {
                warn!(provider = %name, error = %source, "provider query failed");
                if first_failure.is_none() {
                    first_failure = Some(ResolveError::ProviderQuery { provider: name, source });
                }
            }
        }
    }

    match first_failure {
        Some(err) => Err(err),
        None => Ok(answers),
    }
}
