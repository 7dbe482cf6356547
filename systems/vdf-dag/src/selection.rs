//! Weight, disjointness and component grouping over chains.
//!
//! Tie-breaking: wherever "any maximum" or "any subset" appears, this crate
//! picks lexicographically on the chain's sorted `MessageId` sequence.
//! `Chain` is a `BTreeSet<Message>` ordered by id, so its natural iteration
//! order already gives that sequence.

use std::collections::BTreeSet;

use crate::message::{Chain, MessageId};

pub fn weight(chain: &Chain) -> usize {
    chain.len()
}

fn chain_ids(chain: &Chain) -> Vec<MessageId> {
    chain.iter().map(|m| m.id).collect()
}

fn max_round(chain: &Chain) -> u64 {
    chain.iter().map(|m| m.round).max().unwrap_or(0)
}

fn ids_at_round(chain: &Chain, round: u64) -> BTreeSet<MessageId> {
    chain
        .iter()
        .filter(|m| m.round == round)
        .map(|m| m.id)
        .collect()
}

pub fn heaviest_consistent_chains(chains: &[Chain]) -> Vec<Chain> {
    let Some(max_weight) = chains.iter().map(weight).max() else {
        return Vec::new();
    };
    chains
        .iter()
        .filter(|c| weight(c) == max_weight)
        .cloned()
        .collect()
}

pub fn heaviest_consistent_chain(chains: &[Chain]) -> Option<Chain> {
    heaviest_consistent_chains(chains)
        .into_iter()
        .min_by(|a, b| chain_ids(a).cmp(&chain_ids(b)))
}

/// Two chains sharing the same max round are disjoint iff they diverge at
/// some earlier round. Chains with different max rounds are not
/// comparable under the literal definition; this implementation treats
/// that case as "not disjoint" so it never trips the acceptance rule in
/// `accepted` on an ill-matched pair (see DESIGN.md).
pub fn disjoint(c1: &Chain, c2: &Chain) -> bool {
    let r1 = max_round(c1);
    let r2 = max_round(c2);
    if r1 != r2 {
        return false;
    }
    (0..r1).any(|r| ids_at_round(c1, r).is_disjoint(&ids_at_round(c2, r)))
}

/// Maximal groups of chains transitively linked by non-disjointness.
pub fn components(chains: &[Chain]) -> Vec<Vec<Chain>> {
    let n = chains.len();
    let mut parent: Vec<usize> = (0..n).collect();

    fn find(parent: &mut [usize], x: usize) -> usize {
        if parent[x] != x {
            parent[x] = find(parent, parent[x]);
        }
        parent[x]
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if !disjoint(&chains[i], &chains[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[ri] = rj;
                }
            }
        }
    }

    let mut groups: std::collections::BTreeMap<usize, Vec<Chain>> = Default::default();
    for i in 0..n {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(chains[i].clone());
    }

    let mut result: Vec<Vec<Chain>> = groups.into_values().collect();
    for group in result.iter_mut() {
        group.sort_by(|a, b| chain_ids(a).cmp(&chain_ids(b)));
    }
    result.sort_by(|a, b| chain_ids(&a[0]).cmp(&chain_ids(&b[0])));
    result
}

fn component_cardinality(component: &[Chain]) -> usize {
    let union: BTreeSet<MessageId> = component.iter().flat_map(chain_ids).collect();
    union.len()
}

/// `HeaviestComponent(M)`: run `components` over `StronglyConsistentChains(M)`
/// and pick the component of greatest total (unioned) cardinality.
pub fn heaviest_component(strongly_consistent_chains: &[Chain]) -> Option<Vec<Chain>> {
    let comps = components(strongly_consistent_chains);
    comps
        .into_iter()
        .max_by_key(|c| component_cardinality(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, MessageId};

    fn chain(entries: &[(u64, u64, &[u64])]) -> Chain {
        entries
            .iter()
            .map(|&(id, round, coffer)| Message {
                id: MessageId::new(id, 0),
                round,
                coffer: coffer.iter().map(|&c| MessageId::new(c, 0)).collect(),
            })
            .collect()
    }

    #[test]
    fn disjoint_chains_diverge_before_the_tip() {
        let c1 = chain(&[(1, 0, &[]), (3, 1, &[1])]);
        let c2 = chain(&[(2, 0, &[]), (3, 1, &[2])]);
        assert!(disjoint(&c1, &c2));

        let c3 = chain(&[(1, 0, &[]), (3, 1, &[1])]);
        assert!(!disjoint(&c1, &c3));
    }

    #[test]
    fn heaviest_consistent_chain_is_deterministic() {
        let a = chain(&[(1, 0, &[])]);
        let b = chain(&[(2, 0, &[])]);
        let chains = vec![a.clone(), b.clone()];
        let pick1 = heaviest_consistent_chain(&chains).unwrap();
        let pick2 = heaviest_consistent_chain(&chains).unwrap();
        assert_eq!(pick1, pick2);
    }

    #[test]
    fn components_group_non_disjoint_chains() {
        let c1 = chain(&[(1, 0, &[]), (3, 1, &[1])]);
        let c2 = chain(&[(1, 0, &[]), (3, 1, &[1])]);
        let c3 = chain(&[(2, 0, &[]), (4, 1, &[2])]);
        let comps = components(&[c1, c2, c3]);
        assert_eq!(comps.len(), 2);
    }
}
