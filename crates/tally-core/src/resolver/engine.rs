//! Resolver entry points.
//!
//! This module provides the `Resolver` which orchestrates fan-out, grouping and
//! selection. The stages themselves live in [`super::fanout`], [`super::grouping`] and
//! [`super::selection`]; both entry points share the same grouping and selection so they
//! agree for equivalent inputs.

use super::{
    comparator::{Comparator, DeepEquality, JsonComparator},
    config::ResolverConfig,
    errors::ResolveError,
    fanout, grouping,
    provider::Provider,
    selection,
    types::{Resolution, ResolutionMetadata, WeightedAnswer},
};
use futures_util::stream::{Stream, StreamExt};
use std::{fmt::Debug, sync::Arc, time::Instant};
use tracing::debug;

/// Weighted-voting resolver.
///
/// Holds no per-call state: providers are borrowed for one call and every call starts
/// from scratch, so a single resolver can serve concurrent resolutions.
#[derive(Debug, Clone)]
pub struct Resolver<C = DeepEquality> {
    config: ResolverConfig,
    comparator: C,
}

impl Resolver<DeepEquality> {
    /// Creates a resolver comparing answers with [`DeepEquality`].
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_comparator(config, DeepEquality)
    }
}

impl Default for Resolver<DeepEquality> {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl Resolver<JsonComparator> {
    /// Creates a resolver for JSON answers that ignores `config.ignore_fields`.
    #[must_use]
    pub fn json(config: ResolverConfig) -> Self {
        let comparator = JsonComparator::new(config.ignore_fields.clone());
        Self::with_comparator(config, comparator)
    }
}

impl<C> Resolver<C> {
    #[must_use]
    pub fn with_comparator(config: ResolverConfig, comparator: C) -> Self {
        Self { config, comparator }
    }

    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    #[must_use]
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Queries every provider for `key` and resolves their answers.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError` variants:
    /// - `NoProviders`: `providers` is empty; nothing was queried
    /// - `ProviderQuery`: a provider failed; all queries still ran to completion
    /// - `Timeout`: the configured deadline elapsed
    /// - `ConsensusTie`: no unique maximum-weight answer
    pub async fn resolve<K, V, P>(
        &self,
        providers: &[P],
        key: &K,
    ) -> Result<Resolution<V>, ResolveError>
    where
        K: ?Sized + Sync,
        V: Send + Sync + Debug,
        P: Provider<K, V>,
        C: Comparator<V>,
    {
        let start = Instant::now();
        let answers = fanout::query_providers(providers, key, self.config.query_timeout()).await?;
        self.tally(answers, start).await
    }

    /// Collects a lazily produced provider sequence, then resolves as [`Resolver::resolve`].
    ///
    /// The stream is drained completely before the first query is issued, so the number
    /// of concurrent queries is known up front.
    ///
    /// # Errors
    ///
    /// As [`Resolver::resolve`].
    pub async fn resolve_stream<K, V, P, S>(
        &self,
        providers: S,
        key: &K,
    ) -> Result<Resolution<V>, ResolveError>
    where
        K: ?Sized + Sync,
        V: Send + Sync + Debug,
        P: Provider<K, V>,
        S: Stream<Item = P>,
        C: Comparator<V>,
    {
        let providers: Vec<P> = providers.collect().await;
        self.resolve(&providers, key).await
    }

    /// Resolves answers the caller already holds, skipping the fan-out.
    ///
    /// # Errors
    ///
    /// - `NoProviders`: `answers` is empty
    /// - `ConsensusTie`: no unique maximum-weight answer
    pub async fn resolve_answers<V>(
        &self,
        answers: Vec<WeightedAnswer<V>>,
    ) -> Result<Resolution<V>, ResolveError>
    where
        V: Send + Sync + Debug,
        C: Comparator<V>,
    {
        if answers.is_empty() {
            return Err(ResolveError::NoProviders);
        }
        self.tally(answers, Instant::now()).await
    }

    /// Groups answers, selects the winner and assembles the resolution.
    async fn tally<V>(
        &self,
        answers: Vec<WeightedAnswer<V>>,
        start: Instant,
    ) -> Result<Resolution<V>, ResolveError>
    where
        V: Send + Sync + Debug,
        C: Comparator<V>,
    {
        let total_answers = answers.len();
        let groups = grouping::group_answers(answers, &self.comparator).await;
        let winner = selection::select_winner(&groups)?;

        let group_weights: Vec<u64> = groups.iter().map(|g| g.total_weight).collect();
        let total_weight = group_weights.iter().fold(0u64, |acc, w| acc.saturating_add(*w));

        let mut value = None;
        let mut agreement_count = 0;
        let mut supporters = Vec::new();
        let mut dissenters: Vec<Arc<str>> = Vec::new();
        for (index, group) in groups.into_iter().enumerate() {
            if index == winner.index {
                value = group.value;
                agreement_count = group.answers;
                supporters = group.providers;
            } else {
                dissenters.extend(group.providers);
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        debug!(
            answers = total_answers,
            groups = group_weights.len(),
            weight = winner.weight,
            total_weight,
            dissenters = dissenters.len(),
            duration_ms,
            "resolution reached"
        );

        Ok(Resolution {
            value,
            weight: winner.weight,
            total_weight,
            agreement_count,
            total_answers,
            supporters,
            dissenters,
            metadata: ResolutionMetadata { group_weights, winner_index: winner.index, duration_ms },
        })
    }
}

/// Resolves `key` across `providers` with the default resolver.
///
/// # Errors
///
/// As [`Resolver::resolve`].
pub async fn resolve<K, V, P>(providers: &[P], key: &K) -> Result<Resolution<V>, ResolveError>
where
    K: ?Sized + Sync,
    V: PartialEq + Send + Sync + Debug,
    P: Provider<K, V>,
{
    Resolver::new(ResolverConfig::default()).resolve(providers, key).await
}

/// Resolves pre-fetched answers with the default resolver.
///
/// # Errors
///
/// As [`Resolver::resolve_answers`].
pub async fn resolve_answers<V>(
    answers: Vec<WeightedAnswer<V>>,
) -> Result<Resolution<V>, ResolveError>
where
    V: PartialEq + Send + Sync + Debug,
{
    Resolver::new(ResolverConfig::default()).resolve_answers(answers).await
}
