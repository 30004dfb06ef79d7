//! Winner selection over answer groups.
//!
//! The winner is the group with strictly the highest total weight. Weights compare by
//! plain integer order and there is no secondary tie-breaker: two groups at the maximum
//! weight always fail with `ConsensusTie`, however close their values are. Callers that
//! need deterministic tie-breaking must shape their weights so exact ties cannot occur.

use super::{errors::ResolveError, types::AnswerGroup};
use std::fmt::Debug;
use tracing::warn;

/// Index of the winning group within the slice passed to [`select_winner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Winner {
    pub index: usize,
    pub weight: u64,
}

/// Selects the group with the strictly greatest total weight.
///
/// # Errors
///
/// - `ConsensusTie` when more than one group shares the maximum weight
/// - `NoAnswerGroups` when `groups` is empty
pub fn select_winner<V: Debug>(groups: &[AnswerGroup<V>]) -> Result<Winner, ResolveError> {
    let Some(max_weight) = groups.iter().map(|g| g.total_weight).max() else {
        return Err(ResolveError::NoAnswerGroups);
    };

    let mut leaders = groups.iter().enumerate().filter(|(_, g)| g.total_weight == max_weight);

    let Some((index, _)) = leaders.next() else {
        return Err(ResolveError::NoAnswerGroups);
    };

    if leaders.next().is_none() {
        return Ok(Winner { index, weight: max_weight });
    }

    let representatives: Vec<String> = groups
        .iter()
        .filter(|g| g.total_weight == max_weight)
        .map(|g| format!("{:?}", g.value))
        .collect();

    let tied = representatives.len();
    warn!(
        weight = max_weight,
        tied,
        groups = groups.len(),
        "no unique winner: answer groups tied at maximum weight"
    );

    Err(ResolveError::ConsensusTie { weight: max_weight, tied, representatives })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(value: Option<&'static str>, total_weight: u64) -> AnswerGroup<&'static str> {
        AnswerGroup { value, total_weight, answers: 1, providers: vec![] }
    }

    #[test]
    fn test_single_group_wins() {
        let groups = vec![group(Some("b"), 1)];
        assert_eq!(select_winner(&groups).unwrap(), Winner { index: 0, weight: 1 });
    }

    #[test]
    fn test_heaviest_group_wins() {
        let groups = vec![group(Some("b"), 3), group(Some("c"), 10)];
        assert_eq!(select_winner(&groups).unwrap(), Winner { index: 1, weight: 10 });
    }

    #[test]
    fn test_tie_at_maximum() {
        let groups = vec![group(Some("x"), 5), group(Some("y"), 5)];

        match select_winner(&groups) {
            Err(ResolveError::ConsensusTie { weight, tied, representatives }) => {
                assert_eq!(weight, 5);
                assert_eq!(tied, 2);
                assert_eq!(representatives, vec!["Some(\"x\")", "Some(\"y\")"]);
            }
            other => panic!("expected ConsensusTie, got {other:?}"),
        }
    }

    #[test]
    fn test_tie_below_maximum_is_irrelevant() {
        let groups = vec![group(Some("x"), 2), group(Some("y"), 2), group(None, 3)];
        assert_eq!(select_winner(&groups).unwrap(), Winner { index: 2, weight: 3 });
    }

    #[test]
    fn test_three_way_tie() {
        let groups = vec![group(Some("x"), 4), group(Some("y"), 4), group(Some("z"), 4)];
        let err = select_winner(&groups).unwrap_err();
        assert!(matches!(err, ResolveError::ConsensusTie { weight: 4, tied: 3, .. }));
    }

    #[test]
    fn test_empty_groups() {
        let groups: Vec<AnswerGroup<&str>> = vec![];
        assert!(matches!(select_winner(&groups), Err(ResolveError::NoAnswerGroups)));
    }
}
