//! Equality comparators deciding which answers count as the same vote.
//!
//! Comparators are async so that implementations may suspend (for example to consult a
//! normalisation service). The grouping loop awaits one comparison at a time, so an
//! implementation never observes two concurrent calls from the same resolution.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Write;

/// Decides whether two answers belong to the same equivalence class.
///
/// Absent answers are passed as `None` and are not special-cased by the resolver.
/// Implementations must behave as an equivalence relation for the grouping to be a
/// partition.
#[async_trait]
pub trait Comparator<V: Sync>: Send + Sync {
    async fn same(&self, a: Option<&V>, b: Option<&V>) -> bool;
}

/// Structural equality via [`PartialEq`]. Two absent answers are equal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeepEquality;

#[async_trait]
impl<V: PartialEq + Sync> Comparator<V> for DeepEquality {
    async fn same(&self, a: Option<&V>, b: Option<&V>) -> bool {
        a == b
    }
}

/// Adapts a synchronous predicate into a [`Comparator`].
#[derive(Debug, Clone, Copy)]
pub struct FnComparator<F>(F);

/// Wraps a synchronous closure as a comparator.
///
/// ```
/// use tally_core::resolver::comparator_fn;
///
/// let case_insensitive = comparator_fn(|a: Option<&String>, b: Option<&String>| match (a, b) {
///     (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
///     (a, b) => a.is_none() && b.is_none(),
/// });
/// # let _ = case_insensitive;
/// ```
pub fn comparator_fn<V, F>(predicate: F) -> FnComparator<F>
where
    F: Fn(Option<&V>, Option<&V>) -> bool + Send + Sync,
{
    FnComparator(predicate)
}

#[async_trait]
impl<V, F> Comparator<V> for FnComparator<F>
where
    V: Sync,
    F: Fn(Option<&V>, Option<&V>) -> bool + Send + Sync,
{
    async fn same(&self, a: Option<&V>, b: Option<&V>) -> bool {
        (self.0)(a, b)
    }
}

/// Compares JSON answers while ignoring configured field paths.
///
/// Field paths support:
/// - Simple paths: `"timestamp"`, `"etag"`
/// - Nested paths: `"meta.updatedAt"`
/// - Wildcard segments: `"items.*.fetchedAt"` (`*` matches any one segment)
/// - Trailing wildcards: `"debug.*"` (everything below `debug`)
///
/// Object key order never matters. Numbers compare by value as `serde_json` does.
#[derive(Debug, Clone, Default)]
pub struct JsonComparator {
    ignore_paths: Vec<String>,
}

impl JsonComparator {
    #[must_use]
    pub fn new(ignore_paths: Vec<String>) -> Self {
        Self { ignore_paths }
    }

    #[must_use]
    pub fn ignore_paths(&self) -> &[String] {
        &self.ignore_paths
    }

    /// Synchronous form of the comparison.
    #[must_use]
    pub fn values_match(&self, a: &Value, b: &Value) -> bool {
        if self.ignore_paths.is_empty() {
            return a == b;
        }
        let mut path_buffer = String::with_capacity(64);
        json_eq_filtered(a, b, &self.ignore_paths, &mut path_buffer)
    }
}

#[async_trait]
impl Comparator<Value> for JsonComparator {
    async fn same(&self, a: Option<&Value>, b: Option<&Value>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => self.values_match(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Recursive equality skipping ignored paths.
///
/// `path_buffer` holds the dotted path of the values being compared and is restored to
/// its original length before returning.
fn json_eq_filtered(
    a: &Value,
    b: &Value,
    ignore_paths: &[String],
    path_buffer: &mut String,
) -> bool {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let base_len = path_buffer.len();
            let mut equal = true;

            // Every non-ignored key on either side must exist on both and match
            for key in left.keys().chain(right.keys().filter(|k| !left.contains_key(*k))) {
                push_segment(path_buffer, base_len, key);
                if should_ignore_path(path_buffer, ignore_paths) {
                    continue;
                }
                equal = match (left.get(key), right.get(key)) {
                    (Some(l), Some(r)) => json_eq_filtered(l, r, ignore_paths, path_buffer),
                    _ => false,
                };
                if !equal {
                    break;
                }
            }

            path_buffer.truncate(base_len);
            equal
        }
        (Value::Array(left), Value::Array(right)) => {
            let base_len = path_buffer.len();
            push_segment(path_buffer, base_len, "*");
            let wildcard_ignored = should_ignore_path(path_buffer, ignore_paths);
            path_buffer.truncate(base_len);
            if wildcard_ignored {
                return true;
            }
            if left.len() != right.len() {
                return false;
            }

            let mut equal = true;
            for (idx, (l, r)) in left.iter().zip(right).enumerate() {
                path_buffer.truncate(base_len);
                if base_len > 0 {
                    let _ = write!(path_buffer, ".{idx}");
                } else {
                    let _ = write!(path_buffer, "{idx}");
                }
                if should_ignore_path(path_buffer, ignore_paths) {
                    continue;
                }
                if !json_eq_filtered(l, r, ignore_paths, path_buffer) {
                    equal = false;
                    break;
                }
            }

            path_buffer.truncate(base_len);
            equal
        }
        _ => a == b,
    }
}

fn push_segment(path_buffer: &mut String, base_len: usize, segment: &str) {
    path_buffer.truncate(base_len);
    if base_len > 0 {
        path_buffer.push('.');
    }
    path_buffer.push_str(segment);
}

fn should_ignore_path(path: &str, ignore_paths: &[String]) -> bool {
    ignore_paths.iter().any(|ignore| {
        path == ignore || (ignore.contains('*') && matches_wildcard_pattern(path, ignore))
    })
}

/// Matches a path against a wildcard pattern.
/// `*` matches any single segment (between dots).
fn matches_wildcard_pattern(path: &str, pattern: &str) -> bool {
    let path_segments: Vec<&str> = path.split('.').collect();
    let pattern_segments: Vec<&str> = pattern.split('.').collect();

    // A trailing `.*` matches everything below the prefix
    if pattern.ends_with(".*") && pattern_segments.len() <= path_segments.len() {
        return pattern_segments
            .iter()
            .take(pattern_segments.len() - 1)
            .zip(&path_segments)
            .all(|(pat_seg, path_seg)| *pat_seg == "*" || pat_seg == path_seg);
    }

    path_segments.len() == pattern_segments.len() &&
        path_segments
            .iter()
            .zip(&pattern_segments)
            .all(|(path_seg, pat_seg)| *pat_seg == "*" || path_seg == pat_seg)
}
