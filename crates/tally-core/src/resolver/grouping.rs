//! Sequential grouping of weighted answers into equivalence classes.
//!
//! Grouping is a single pass in arrival order. Each answer is compared against the
//! existing groups one at a time, awaiting every comparison before the next starts, so
//! a suspending comparator never sees the group list change underneath it.
//!
//! # Complexity
//!
//! O(n·g) comparisons for n answers and g distinct groups. A hash-keyed map cannot be
//! used because equality is decided by an arbitrary comparator, not by `Hash`.

use super::{
    comparator::Comparator,
    types::{AnswerGroup, WeightedAnswer},
};

/// Groups answers by comparator equality, summing weights per group.
///
/// Groups are returned in first-seen order and each keeps the first value of its class
/// as representative. Every answer lands in exactly one group.
pub async fn group_answers<V, C>(
    answers: Vec<WeightedAnswer<V>>,
    comparator: &C,
) -> Vec<AnswerGroup<V>>
where
    V: Sync,
    C: Comparator<V> + ?Sized,
{
    let mut groups: Vec<AnswerGroup<V>> = Vec::new();

    for answer in answers {
        let mut matched = None;
        for (index, group) in groups.iter().enumerate() {
            if comparator.same(group.value.as_ref(), answer.value.as_ref()).await {
                matched = Some(index);
                break;
            }
        }

        match matched {
            Some(index) => groups[index].absorb(answer),
            None => groups.push(AnswerGroup::open(answer)),
        }
    }

    groups
}
