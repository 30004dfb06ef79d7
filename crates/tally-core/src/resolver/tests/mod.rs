//! Tests for the resolver module.
//!
//! Tests are organized by component:
//! - `engine_tests`: End-to-end tests for `Resolver` over providers and pre-fetched answers
//! - Unit tests for fan-out, grouping and selection are in their respective modules
