//! Chain enumeration: all `ConsistentChain`s / `StronglyConsistentChain`s
//! anchored at the DAG's own max round.
//!
//! A consequence of the recursive definition is that a valid chain always covers
//! every round from 0 up to its own max round — a round `r > 0` with no
//! round `r-1` messages fails the tip check outright. So candidates are
//! built round by round: start from every nonempty subset of round 0, then
//! at each following round extend every surviving prefix by every nonempty
//! subset of that round whose tip check passes against the prefix's own
//! previous layer. This is naturally exponential in round fanout; the DP
//! below memoizes on "prefix so far" rather than re-deriving the whole
//! history at each step.

use std::collections::BTreeSet;

use crate::message::{Chain, Message, MessageId};
use crate::sets::{intersection, is_strict_majority};

struct Prefix {
    ids: BTreeSet<MessageId>,
    last_layer: BTreeSet<MessageId>,
}

fn nonempty_subsets<'a>(items: &'a [&'a Message]) -> impl Iterator<Item = Vec<&'a Message>> + 'a {
    let n = items.len();
    (1u32..(1u32 << n)).map(move |mask| {
        (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| items[i])
            .collect()
    })
}

fn tip_ok(tip: &[&Message], last_layer: &BTreeSet<MessageId>, strong: bool) -> bool {
    if last_layer.is_empty() {
        return false;
    }
    if strong {
        return tip.iter().all(|m| {
            last_layer.is_subset(&m.coffer) && is_strict_majority(last_layer.len(), m.coffer.len())
        });
    }
    let coffers: Vec<BTreeSet<MessageId>> = tip.iter().map(|m| m.coffer.clone()).collect();
    let maj: BTreeSet<MessageId> = intersection(&coffers)
        .intersection(last_layer)
        .copied()
        .collect();
    // maj must cover the whole predecessor layer in this candidate prefix,
    // not just some nonempty piece of it — an uncovered member is an orphan
    // the tip never agreed on, which the subset search above prunes by
    // trying the prefix without it instead.
    maj == *last_layer && tip.iter().all(|m| is_strict_majority(maj.len(), m.coffer.len()))
}

fn enumerate(messages: &[Message], strong: bool) -> Vec<Chain> {
    if messages.is_empty() {
        return Vec::new();
    }

    let mut by_round: std::collections::BTreeMap<u64, Vec<&Message>> = Default::default();
    for m in messages {
        by_round.entry(m.round).or_default().push(m);
    }
    let max_round = *by_round.keys().next_back().unwrap();

    let mut prefixes: Vec<Prefix> = match by_round.get(&0) {
        None => return Vec::new(),
        Some(round0) => nonempty_subsets(round0)
            .map(|subset| Prefix {
                ids: subset.iter().map(|m| m.id).collect(),
                last_layer: subset.iter().map(|m| m.id).collect(),
            })
            .collect(),
    };

    for round in 1..=max_round {
        let Some(layer) = by_round.get(&round) else {
            return Vec::new(); // a present higher round with a gap below can't extend
        };
        let mut next = Vec::new();
        for prefix in &prefixes {
            for subset in nonempty_subsets(layer) {
                if tip_ok(&subset, &prefix.last_layer, strong) {
                    let mut ids = prefix.ids.clone();
                    let layer_ids: BTreeSet<MessageId> = subset.iter().map(|m| m.id).collect();
                    ids.extend(layer_ids.iter().copied());
                    next.push(Prefix {
                        ids,
                        last_layer: layer_ids,
                    });
                }
            }
        }
        prefixes = next;
        if prefixes.is_empty() {
            return Vec::new();
        }
    }

    let index: std::collections::BTreeMap<MessageId, &Message> =
        messages.iter().map(|m| (m.id, m)).collect();
    prefixes
        .into_iter()
        .map(|p| p.ids.into_iter().map(|id| index[&id].clone()).collect())
        .collect()
}

pub fn consistent_chains(messages: &[Message]) -> Vec<Chain> {
    enumerate(messages, false)
}

pub fn strongly_consistent_chains(messages: &[Message]) -> Vec<Chain> {
    enumerate(messages, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: u64, round: u64, coffer: &[u64]) -> Message {
        Message {
            id: MessageId::new(id, 0),
            round,
            coffer: coffer.iter().map(|&c| MessageId::new(c, 0)).collect(),
        }
    }

    // Two overlapping round-1 tips over the same round-0 triple (see
    // DESIGN.md for the heaviest-chain tie this DAG produces): every
    // enumerated chain is consistent, anchored at the DAG's max round, and
    // the maximum cardinality is well-defined. m3 can never join a chain
    // alongside both m4 and m5, since their shared agreement is only
    // {1,2}: the full set {m1..m5} is not itself a consistent chain, so the
    // heaviest chains top out at 4, tied between {m1,m2,m3,m5} (m5 alone
    // names all three round-0 ids) and {m1,m2,m4,m5}.
    #[test]
    fn heaviest_chain_is_maximal_and_anchored() {
        let m1 = m(1, 0, &[]);
        let m2 = m(2, 0, &[]);
        let m3 = m(3, 0, &[]);
        let m4 = m(4, 1, &[1, 2]);
        let m5 = m(5, 1, &[1, 2, 3]);
        let messages = vec![m1, m2, m3, m4, m5];

        let chains = consistent_chains(&messages);
        assert!(!chains.is_empty());
        let max_weight = chains.iter().map(|c| c.len()).max().unwrap();
        assert!(chains.iter().all(|c| c.iter().any(|m| m.round == 1)));
        assert_eq!(max_weight, 4);

        let heaviest: std::collections::BTreeSet<BTreeSet<u64>> = chains
            .iter()
            .filter(|c| c.len() == max_weight)
            .map(|c| c.iter().map(|m| m.id.process).collect())
            .collect();
        assert_eq!(
            heaviest,
            std::collections::BTreeSet::from([
                BTreeSet::from([1, 2, 3, 5]),
                BTreeSet::from([1, 2, 4, 5]),
            ])
        );
    }

    #[test]
    fn no_chains_when_round_gap() {
        let m1 = m(1, 0, &[]);
        let m2 = m(2, 2, &[1]); // declares round 2 with nothing at round 1
        assert!(consistent_chains(&[m1, m2]).is_empty());
    }
}
