//! Property tests over randomly generated DAGs (U1-U4, U7). Simulation-driven
//! properties (U5, U6) live in `tests/simulation.rs`, since they need a
//! running `dscale::Simulation` rather than a bare message slice.

use proptest::prelude::*;

use vdf_dag::message::{Message, MessageId};
use vdf_dag::{consistency, enumeration, selection, sets};
use vdf_dag::Dag;

/// Builds a round-by-round DAG: `num_rounds` layers, `sizes[r]` messages per
/// round `r`, each round-`r` message's coffer drawn from round `r-1`'s ids
/// via `masks[r-1][i] % sizes[r-1]`. Round 0 always has an empty coffer.
fn build_dag(num_rounds: usize, sizes: [usize; 3], masks1: &[Vec<u8>], masks2: &[Vec<u8>]) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut prev_ids: Vec<MessageId> = Vec::new();

    for r in 0..num_rounds {
        let size = sizes[r];
        let mut cur_ids = Vec::with_capacity(size);
        for i in 0..size {
            let id = MessageId::new(r as u64, i as u64);
            let coffer = if r == 0 {
                std::collections::BTreeSet::new()
            } else {
                let votes: &Vec<u8> = if r == 1 { &masks1[i] } else { &masks2[i] };
                votes
                    .iter()
                    .map(|&v| prev_ids[(v as usize) % prev_ids.len()])
                    .collect()
            };
            messages.push(Message { id, round: r as u64, coffer });
            cur_ids.push(id);
        }
        prev_ids = cur_ids;
    }
    messages
}

fn dag_strategy() -> impl Strategy<Value = Vec<Message>> {
    (1usize..=3, 1usize..=3, 1usize..=3)
        .prop_flat_map(|(s0, s1, s2)| {
            (1usize..=3usize).prop_flat_map(move |num_rounds| {
                let sizes = [s0, s1, s2];
                let masks1 = prop::collection::vec(prop::collection::vec(0u8..6, 0..4), sizes[1]);
                let masks2 = prop::collection::vec(prop::collection::vec(0u8..6, 0..4), sizes[2]);
                (Just(num_rounds), Just(sizes), masks1, masks2)
            })
        })
        .prop_map(|(num_rounds, sizes, masks1, masks2)| build_dag(num_rounds, sizes, &masks1, &masks2))
}

proptest! {
    // (U1 support) both consistency predicates only look at message content,
    // never at slice order, so permuting the input must not change the verdict.
    #[test]
    fn consistent_set_is_order_independent(dag in dag_strategy()) {
        let forward: Vec<&Message> = dag.iter().collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        prop_assert_eq!(
            consistency::consistent_set(&forward),
            consistency::consistent_set(&reversed)
        );
    }

    #[test]
    fn chain_predicates_are_order_independent(dag in dag_strategy()) {
        let forward: Vec<&Message> = dag.iter().collect();
        let mut reversed = forward.clone();
        reversed.reverse();
        prop_assert_eq!(
            consistency::consistent_chain(&forward),
            consistency::consistent_chain(&reversed)
        );
        prop_assert_eq!(
            consistency::strongly_consistent_chain(&forward),
            consistency::strongly_consistent_chain(&reversed)
        );
    }

    // (U2) StronglyConsistentChain(M) => ConsistentChain(M).
    #[test]
    fn strongly_consistent_chain_implies_consistent_chain(dag in dag_strategy()) {
        let refs: Vec<&Message> = dag.iter().collect();
        if consistency::strongly_consistent_chain(&refs) {
            prop_assert!(consistency::consistent_chain(&refs));
        }
    }

    // (U4) HeaviestConsistentChain(M) is a maximal-cardinality element of
    // ConsistentChains(M), or None iff that set is empty.
    #[test]
    fn heaviest_chain_is_a_maximal_member(dag in dag_strategy()) {
        let chains = enumeration::consistent_chains(&dag);
        let heaviest = selection::heaviest_consistent_chain(&chains);
        match heaviest {
            None => prop_assert!(chains.is_empty()),
            Some(h) => {
                let max_weight = chains.iter().map(selection::weight).max().unwrap();
                prop_assert_eq!(selection::weight(&h), max_weight);
                prop_assert!(chains.contains(&h));
            }
        }
    }

    // The CHOOSE tie-break must be a function of the chain set, not of call order.
    #[test]
    fn heaviest_chain_pick_is_deterministic(dag in dag_strategy()) {
        let chains = enumeration::consistent_chains(&dag);
        let a = selection::heaviest_consistent_chain(&chains);
        let b = selection::heaviest_consistent_chain(&chains);
        prop_assert_eq!(a, b);
    }

    // (U3) Intersection({}) = {}; Intersection({S}) = S; folded pairwise otherwise.
    #[test]
    fn intersection_laws_hold(
        sets in prop::collection::vec(prop::collection::btree_set(0u64..20, 0..6), 0..5)
    ) {
        let got = sets::intersection(&sets);
        match sets.split_first() {
            None => prop_assert!(got.is_empty()),
            Some((first, rest)) => {
                let manual = rest
                    .iter()
                    .fold(first.clone(), |acc, s| acc.intersection(s).copied().collect());
                prop_assert_eq!(got, manual);
            }
        }
    }

    // (U7) The DAG store never loses a previously admitted message.
    #[test]
    fn dag_is_append_only(dag in dag_strategy()) {
        let mut store = Dag::new();
        let mut prev_ids: Vec<MessageId> = Vec::new();
        for m in dag {
            let _ = store.try_insert(m);
            let ids: Vec<MessageId> = store.snapshot().iter().map(|m| m.id).collect();
            prop_assert!(prev_ids.iter().all(|id| ids.contains(id)));
            prev_ids = ids;
        }
    }
}
