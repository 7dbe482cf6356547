//! The adversary's existential choice, injected as a callback so property
//! tests can drive worst-case schedules without the algebra itself
//! depending on a model checker. Strategy is supplied via a constructor
//! field rather than a global, the same way transport and clock
//! dependencies are wired through the rest of this crate.

use std::collections::BTreeSet;

use crate::message::MessageId;

pub trait AdversaryOracle {
    /// Picks the round and coffer for the next Byzantine message, given
    /// what it has observed at the predecessor round and the highest round
    /// it has seen anywhere.
    fn choose_coffer(
        &mut self,
        known_at_predecessor_round: &BTreeSet<MessageId>,
        max_seen_round: u64,
    ) -> (u64, BTreeSet<MessageId>);
}

/// The least-adversarial behavior: names everything it's seen, at the
/// round it's already observed. Worst-case schedules are supplied by
/// test-only implementations of `AdversaryOracle`.
#[derive(Default)]
pub struct DefaultAdversary;

impl AdversaryOracle for DefaultAdversary {
    fn choose_coffer(
        &mut self,
        known_at_predecessor_round: &BTreeSet<MessageId>,
        max_seen_round: u64,
    ) -> (u64, BTreeSet<MessageId>) {
        (max_seen_round, known_at_predecessor_round.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adversary_is_maximally_cooperative() {
        let known = BTreeSet::from([MessageId::new(1, 0), MessageId::new(2, 0)]);
        let (round, coffer) = DefaultAdversary.choose_coffer(&known, 5);
        assert_eq!(round, 5);
        assert_eq!(coffer, known);
    }

    struct EmptyCofferAdversary;
    impl AdversaryOracle for EmptyCofferAdversary {
        fn choose_coffer(
            &mut self,
            _known_at_predecessor_round: &BTreeSet<MessageId>,
            max_seen_round: u64,
        ) -> (u64, BTreeSet<MessageId>) {
            (max_seen_round + 1, BTreeSet::new())
        }
    }

    #[test]
    fn worst_case_oracle_can_skip_a_round_with_no_predecessors() {
        let known = BTreeSet::from([MessageId::new(1, 0)]);
        let (round, coffer) = EmptyCofferAdversary.choose_coffer(&known, 2);
        assert_eq!(round, 3);
        assert!(coffer.is_empty());
    }
}
