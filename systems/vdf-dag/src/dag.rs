//! The DAG store and its admission path.
//!
//! `try_insert` is the boundary between untrusted inbound messages and the
//! `Complete`-DAG invariants: a message failing one of them is dropped and
//! counted, never panicked on.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::ConsensusError;
use crate::message::{Message, MessageId};

#[derive(Default)]
pub struct Dag {
    messages: BTreeMap<MessageId, Message>,
    by_round: BTreeMap<u64, BTreeSet<MessageId>>,
    rejected: u64,
}

impl Dag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and admits `m`. Rejections never mutate the store.
    pub fn try_insert(&mut self, m: Message) -> Result<(), ConsensusError> {
        if let Some(existing) = self.messages.get(&m.id) {
            if existing.round == m.round && existing.coffer == m.coffer {
                return Ok(()); // idempotent re-delivery
            }
            return Err(ConsensusError::MessageMalformed {
                id: m.id,
                reason: "id reused with different content".into(),
            });
        }

        if m.round == 0 && !m.coffer.is_empty() {
            return Err(ConsensusError::MessageMalformed {
                id: m.id,
                reason: "round-0 message declares a non-empty coffer".into(),
            });
        }

        for pred_id in &m.coffer {
            if let Some(pred) = self.messages.get(pred_id) {
                if pred.round + 1 != m.round {
                    return Err(ConsensusError::MessageMalformed {
                        id: m.id,
                        reason: format!("coffer entry {pred_id} is not at round - 1"),
                    });
                }
            }
            // Entries not yet delivered are tolerated (dangling, the dangling-predecessor rule).
        }

        self.by_round.entry(m.round).or_default().insert(m.id);
        self.messages.insert(m.id, m);
        Ok(())
    }

    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }

    pub fn get(&self, id: &MessageId) -> Option<&Message> {
        self.messages.get(id)
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn max_round(&self) -> Option<u64> {
        self.by_round.keys().next_back().copied()
    }

    pub fn at_round(&self, round: u64) -> impl Iterator<Item = &Message> {
        self.by_round
            .get(&round)
            .into_iter()
            .flat_map(|ids| ids.iter())
            .filter_map(move |id| self.messages.get(id))
    }

    /// A read-only snapshot of everything currently admitted, in the shape
    /// the chain algebra operates on.
    pub fn snapshot(&self) -> Vec<Message> {
        self.messages.values().cloned().collect()
    }

    /// `Complete` per the dangling-predecessor rule: every coffer entry resolves to a message one
    /// round below it, with no dangling ids.
    pub fn is_complete(&self) -> bool {
        self.messages.values().all(|m| {
            m.coffer.iter().all(|pred_id| {
                self.messages
                    .get(pred_id)
                    .is_some_and(|pred| pred.round + 1 == m.round)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(process: u64, counter: u64, round: u64, coffer: &[(u64, u64)]) -> Message {
        Message {
            id: MessageId::new(process, counter),
            round,
            coffer: coffer
                .iter()
                .map(|&(p, c)| MessageId::new(p, c))
                .collect(),
        }
    }

    #[test]
    fn rejects_round_zero_with_coffer() {
        let mut dag = Dag::new();
        let bad = msg(1, 0, 0, &[(2, 0)]);
        assert!(dag.try_insert(bad).is_err());
        assert!(dag.is_empty());
    }

    #[test]
    fn tolerates_dangling_predecessor() {
        let mut dag = Dag::new();
        let m = msg(1, 0, 1, &[(9, 9)]);
        assert!(dag.try_insert(m).is_ok());
        assert!(!dag.is_complete());
    }

    #[test]
    fn idempotent_reinsert_is_ok() {
        let mut dag = Dag::new();
        let m = msg(1, 0, 0, &[]);
        dag.try_insert(m.clone()).unwrap();
        assert!(dag.try_insert(m).is_ok());
        assert_eq!(dag.len(), 1);
    }

    #[test]
    fn rejects_reused_id_with_different_content() {
        let mut dag = Dag::new();
        dag.try_insert(msg(1, 0, 0, &[])).unwrap();
        let conflicting = msg(1, 0, 1, &[]);
        assert!(dag.try_insert(conflicting).is_err());
    }

    #[test]
    fn is_complete_once_predecessors_resolve() {
        let mut dag = Dag::new();
        dag.try_insert(msg(1, 0, 0, &[])).unwrap();
        dag.try_insert(msg(2, 0, 1, &[(1, 0)])).unwrap();
        assert!(dag.is_complete());
    }
}
