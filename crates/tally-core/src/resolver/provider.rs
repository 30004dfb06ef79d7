//! The provider capability queried during fan-out.

use super::{errors::BoxError, types::Weight};
use async_trait::async_trait;
use std::{borrow::Borrow, collections::HashMap, hash::Hash, sync::Arc};

/// A source that can answer a keyed lookup and declares its voting weight.
///
/// Providers are owned by the caller and only borrowed for the duration of one
/// resolution. The resolver keeps no provider state between calls.
#[async_trait]
pub trait Provider<K: ?Sized + Sync, V: Send>: Send + Sync {
    /// Looks up `key`. `Ok(None)` means the provider has no answer, which still counts as
    /// a vote.
    async fn query(&self, key: &K) -> Result<Option<V>, BoxError>;

    /// Voting weight of this provider's answers.
    fn weight(&self) -> Weight {
        Weight::default()
    }

    /// Name used to attribute answers and failures.
    fn name(&self) -> Arc<str> {
        Arc::from(std::any::type_name::<Self>())
    }
}

#[async_trait]
impl<K, V, P> Provider<K, V> for Arc<P>
where
    K: ?Sized + Sync,
    V: Send,
    P: Provider<K, V> + ?Sized,
{
    async fn query(&self, key: &K) -> Result<Option<V>, BoxError> {
        (**self).query(key).await
    }

    fn weight(&self) -> Weight {
        (**self).weight()
    }

    fn name(&self) -> Arc<str> {
        (**self).name()
    }
}

/// In-memory provider answering from a fixed table.
///
/// A provider built with [`StaticProvider::failing`] rejects every query, which makes it
/// useful for exercising failure paths.
#[derive(Debug, Clone)]
pub struct StaticProvider<K, V> {
    name: Arc<str>,
    weight: Weight,
    answers: HashMap<K, V>,
    failure: Option<String>,
}

impl<K: Eq + Hash, V> StaticProvider<K, V> {
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, weight: Weight) -> Self {
        Self { name: name.into(), weight, answers: HashMap::new(), failure: None }
    }

    /// Creates a provider whose queries always fail with `message`.
    #[must_use]
    pub fn failing(name: impl Into<Arc<str>>, weight: Weight, message: impl Into<String>) -> Self {
        Self { failure: Some(message.into()), ..Self::new(name, weight) }
    }

    #[must_use]
    pub fn with_answer(mut self, key: K, value: V) -> Self {
        self.answers.insert(key, value);
        self
    }

    #[must_use]
    pub fn with_answers(mut self, answers: impl IntoIterator<Item = (K, V)>) -> Self {
        self.answers.extend(answers);
        self
    }
}

#[async_trait]
impl<Q, K, V> Provider<Q, V> for StaticProvider<K, V>
where
    Q: ?Sized + Hash + Eq + Sync,
    K: Borrow<Q> + Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    async fn query(&self, key: &Q) -> Result<Option<V>, BoxError> {
        if let Some(message) = &self.failure {
            return Err(message.clone().into());
        }
        Ok(self.answers.get(key).cloned())
    }

    fn weight(&self) -> Weight {
        self.weight
    }

    fn name(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}
