//! Set-theoretic primitives shared by the consistency predicates.

use std::collections::BTreeSet;

use crate::message::MessageId;

/// `Intersection({})= {}`, `Intersection({S}) = S`, folded pairwise
/// otherwise. Order-independent: `sets` may arrive in any order.
pub fn intersection(sets: &[BTreeSet<MessageId>]) -> BTreeSet<MessageId> {
    match sets.split_first() {
        None => BTreeSet::new(),
        Some((first, rest)) => rest
            .iter()
            .fold(first.clone(), |acc, s| acc.intersection(s).copied().collect()),
    }
}

/// "Strict majority of `count` in `total`": `2*count > total`.
pub fn is_strict_majority(count: usize, total: usize) -> bool {
    2 * count > total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(ids: &[u64]) -> BTreeSet<MessageId> {
        ids.iter().map(|&c| MessageId::new(0, c)).collect()
    }

    #[test]
    fn intersection_laws() {
        assert_eq!(intersection(&[]), BTreeSet::new());
        assert_eq!(intersection(&[set(&[1, 2])]), set(&[1, 2]));
        assert_eq!(intersection(&[set(&[1, 2]), set(&[2, 3])]), set(&[2]));
        assert_eq!(intersection(&[set(&[1, 2]), set(&[3, 4])]), BTreeSet::new());
    }

    #[test]
    fn strict_majority() {
        assert!(is_strict_majority(2, 3));
        assert!(!is_strict_majority(1, 3));
        assert!(!is_strict_majority(0, 0));
    }
}
