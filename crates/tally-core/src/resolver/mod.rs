//! # Resolution Algorithm Overview
//!
//! The resolver reduces the answers of several independent providers for one key into a
//! single authoritative value by weighted majority voting.
//!
//! ## Algorithm Steps
//!
//! 1. **Fan-Out**: Query every provider concurrently and wait for all of them
//! 2. **Grouping**: Merge answers the comparator judges equal, summing their weights
//! 3. **Selection**: Return the group whose total weight is strictly the greatest
//!
//! ## Failure Modes
//!
//! - **No providers**: `NoProviders`, before any query is issued
//! - **Provider failure**: `ProviderQuery` carrying the first observed error; the remaining
//!   queries still run to completion and no answer is produced
//! - **Tie**: `ConsensusTie` when two or more groups share the maximum weight
//! - **Deadline**: `Timeout`, only when `query_timeout_ms` is configured
//!
//! # Module Organization
//!
//! - [`config`]: Resolver configuration (`ResolverConfig`)
//! - [`types`]: `Weight`, `WeightedAnswer`, `AnswerGroup`, `Resolution`
//! - [`errors`]: `ResolveError`
//! - [`provider`]: The `Provider` capability and `StaticProvider`
//! - [`comparator`]: The `Comparator` capability, `DeepEquality`, `JsonComparator`
//! - [`fanout`]: Concurrent provider querying
//! - [`grouping`]: Sequential answer grouping
//! - [`selection`]: Winner selection and tie detection
//! - [`engine`]: Orchestration (`Resolver` - main entry point)

pub mod comparator;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fanout;
pub mod grouping;
pub mod provider;
pub mod selection;
pub mod types;

#[cfg(test)]
mod tests;

pub use comparator::{comparator_fn, Comparator, DeepEquality, FnComparator, JsonComparator};
pub use config::ResolverConfig;
pub use engine::{resolve, resolve_answers, Resolver};
pub use errors::{BoxError, ResolveError};
pub use provider::{Provider, StaticProvider};
pub use types::{AnswerGroup, InvalidWeight, Resolution, ResolutionMetadata, Weight, WeightedAnswer};
