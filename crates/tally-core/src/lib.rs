//! # Tally Core
//!
//! Weighted-voting consensus resolution across independent key-value providers.
//!
//! A caller hands the [`resolver::Resolver`] a set of providers and a key. Every provider
//! is queried concurrently, answers judged equal by a pluggable comparator are merged into
//! groups, and the group carrying strictly the greatest total weight wins. Anything short
//! of a unique winner is an explicit error.
//!
//! - **[`resolver`]**: providers, comparators, fan-out querying, grouping and winner selection.
//! - **[`config`]**: layered application configuration (defaults, TOML file, environment).
//!
//! ## Resolution Flow
//!
//! ```text
//!  providers + key
//!        │
//!        ▼
//! ┌──────────────┐
//! │   Fan-Out    │ ─── any query fails ──► ProviderQuery error
//! │ (concurrent) │
//! └──────┬───────┘
//!        │ weighted answers (arrival order)
//!        ▼
//! ┌──────────────┐
//! │   Grouping   │  sequential, one comparison at a time
//! └──────┬───────┘
//!        │ answer groups
//!        ▼
//! ┌──────────────┐
//! │  Selection   │ ─── max weight shared ──► ConsensusTie error
//! └──────┬───────┘
//!        │
//!        ▼
//!    Resolution
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use tally_core::resolver::{Resolver, ResolverConfig, StaticProvider, Weight};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let providers = vec![
//!     StaticProvider::new("primary", Weight::new(2)?).with_answer("a", "b"),
//!     StaticProvider::new("mirror", Weight::default()).with_answer("a", "c"),
//! ];
//!
//! let resolver = Resolver::new(ResolverConfig::default());
//! let resolution = resolver.resolve(&providers, "a").await?;
//! assert_eq!(resolution.value, Some("b"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod resolver;

pub use resolver::{
    resolve, resolve_answers, AnswerGroup, BoxError, Comparator, DeepEquality, InvalidWeight,
    JsonComparator, Provider, Resolution, ResolveError, Resolver, ResolverConfig,
    StaticProvider, Weight, WeightedAnswer,
};
