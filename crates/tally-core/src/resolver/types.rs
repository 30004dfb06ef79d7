//! Weighted answers, answer groups and resolution results.

use serde::{Deserialize, Serialize};
use std::{fmt, num::NonZeroU32, sync::Arc};
use thiserror::Error;

/// Voting weight carried by a provider's answer.
///
/// Weights are strictly positive. Providers that do not declare a weight vote with
/// [`Weight::default`], which is 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Weight(NonZeroU32);

impl Weight {
    /// The default voting weight.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Creates a weight, rejecting zero.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidWeight`] if `value` is zero.
    pub fn new(value: u32) -> Result<Self, InvalidWeight> {
        NonZeroU32::new(value).map(Self).ok_or(InvalidWeight(value))
    }

    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Weight {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Weight {
    type Error = InvalidWeight;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Weight> for u32 {
    fn from(weight: Weight) -> Self {
        weight.get()
    }
}

impl From<Weight> for u64 {
    fn from(weight: Weight) -> Self {
        u64::from(weight.get())
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A weight of zero was supplied where a positive weight is required.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Invalid weight {0}: weights must be positive")]
pub struct InvalidWeight(pub u32);

/// One provider's answer for a key together with its voting weight.
///
/// `value: None` means the provider had nothing to contribute. It still votes, and is
/// grouped like any other value.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedAnswer<V> {
    pub value: Option<V>,
    pub weight: Weight,
    /// Name of the provider that produced this answer, when known.
    pub provider: Option<Arc<str>>,
}

impl<V> WeightedAnswer<V> {
    #[must_use]
    pub fn new(value: Option<V>, weight: Weight) -> Self {
        Self { value, weight, provider: None }
    }

    /// Creates an answer voting with the default weight of 1.
    #[must_use]
    pub fn unweighted(value: Option<V>) -> Self {
        Self::new(value, Weight::default())
    }

    /// Attributes this answer to a named provider.
    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<Arc<str>>) -> Self {
        self.provider = Some(provider.into());
        self
    }
}

/// Answers judged equal by the comparator, represented by the first value seen.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerGroup<V> {
    /// Representative value: the first answer of this class in arrival order.
    pub value: Option<V>,
    /// Sum of the weights of every answer in the group.
    pub total_weight: u64,
    /// Number of answers merged into the group.
    pub answers: usize,
    /// Names of the attributed providers that returned this answer.
    pub providers: Vec<Arc<str>>,
}

impl<V> AnswerGroup<V> {
    pub(crate) fn open(answer: WeightedAnswer<V>) -> Self {
        Self {
            value: answer.value,
            total_weight: u64::from(answer.weight),
            answers: 1,
            providers: answer.provider.into_iter().collect(),
        }
    }

    /// Adds an equal answer to the group. The representative value is kept.
    pub(crate) fn absorb(&mut self, answer: WeightedAnswer<V>) {
        self.total_weight = self.total_weight.saturating_add(u64::from(answer.weight));
        self.answers += 1;
        if let Some(provider) = answer.provider {
            self.providers.push(provider);
        }
    }
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution<V> {
    /// The winning representative value. `None` when the absent answer won.
    pub value: Option<V>,
    /// Total weight of the winning group.
    pub weight: u64,
    /// Total weight across every answer.
    pub total_weight: u64,
    /// Number of answers in the winning group.
    pub agreement_count: usize,
    /// Number of answers considered.
    pub total_answers: usize,
    /// Providers that voted for the winner.
    pub supporters: Vec<Arc<str>>,
    /// Providers that voted for any other answer.
    pub dissenters: Vec<Arc<str>>,
    pub metadata: ResolutionMetadata,
}

impl<V> Resolution<V> {
    #[must_use]
    pub fn into_value(self) -> Option<V> {
        self.value
    }

    /// Returns `true` when every answer agreed with the winner.
    #[must_use]
    pub fn is_unanimous(&self) -> bool {
        self.metadata.group_weights.len() == 1
    }

    /// Weight by which the winner beat the runner-up. Equals `weight` when unanimous.
    #[must_use]
    pub fn margin(&self) -> u64 {
        let runner_up = self
            .metadata
            .group_weights
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != self.metadata.winner_index)
            .map(|(_, weight)| *weight)
            .max()
            .unwrap_or(0);
        self.weight.saturating_sub(runner_up)
    }
}

/// How the resolution was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionMetadata {
    /// Total weight of every group, in first-seen order.
    pub group_weights: Vec<u64>,
    /// Position of the winning group within `group_weights`.
    pub winner_index: usize,
    pub duration_ms: u64,
}
