//! `Accepted(M)`: the commit predicate each well-behaved
//! process evaluates on its own view before starting a new VDF.
//!
//! A message is excluded the moment it sits on the strictly lighter side
//! of some disjoint strongly-consistent-chain split; this is an O(chains²)
//! pairwise scan over the enumerated chains, which is fine at the sizes
//! this algebra is meant to run at.

use std::collections::BTreeSet;

use crate::enumeration::strongly_consistent_chains;
use crate::message::{Message, MessageId};
use crate::selection::{disjoint, weight};

pub fn accepted(messages: &[Message]) -> BTreeSet<MessageId> {
    let chains = strongly_consistent_chains(messages);
    let mut excluded = BTreeSet::new();

    for (i, ci) in chains.iter().enumerate() {
        for (j, cj) in chains.iter().enumerate() {
            if i == j || !disjoint(ci, cj) || weight(ci) >= weight(cj) {
                continue;
            }
            for m in ci {
                if !cj.contains(m) {
                    excluded.insert(m.id);
                }
            }
        }
    }

    messages
        .iter()
        .map(|m| m.id)
        .filter(|id| !excluded.contains(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageId;

    fn m(id: u64, round: u64, coffer: &[u64]) -> Message {
        Message {
            id: MessageId::new(id, 0),
            round,
            coffer: coffer.iter().map(|&c| MessageId::new(c, 0)).collect(),
        }
    }

    // With a single coherent round-0 set, nothing forks, so everything is
    // accepted.
    #[test]
    fn no_fork_accepts_everything() {
        let m1 = m(1, 0, &[]);
        let m2 = m(2, 0, &[]);
        let messages = vec![m1.clone(), m2.clone()];
        let acc = accepted(&messages);
        assert_eq!(acc, BTreeSet::from([m1.id, m2.id]));
    }

    // Two same-weight forks never exclude each other (the rule only fires
    // on a *strictly* lighter side).
    #[test]
    fn equal_weight_disjoint_forks_stay_accepted() {
        let a0 = m(1, 0, &[]);
        let b0 = m(2, 0, &[]);
        let a1 = m(3, 1, &[1]);
        let b1 = m(4, 1, &[2]);
        let messages = vec![a0.clone(), b0.clone(), a1.clone(), b1.clone()];
        let acc = accepted(&messages);
        assert!(acc.contains(&a1.id));
        assert!(acc.contains(&b1.id));
    }
}
