//! The validator itself: decides what message to start a VDF over, holds it
//! for the VDF's duration, then releases it into the DAG and onto the wire.
//!
//! Round and coffer selection are pure functions of the local view
//! (`decide_well_behaved` / `decide_byzantine`), kept free of `dscale`
//! globals so they can be exercised directly in tests. `ProcessHandle` is
//! just the tick-driven glue around them.

use std::collections::BTreeSet;
use std::rc::Rc;

use dscale::global::anykv;
use dscale::helpers::debug_process;
use dscale::{MessagePtr, ProcessHandle, ProcessId as DscaleProcessId, TimerId};
use dscale::{broadcast_within_pool, list_pool, now, rank, send_to};

use crate::adversary::{AdversaryOracle, DefaultAdversary};
use crate::config::Config;
use crate::dag::Dag;
use crate::error::ConsensusError;
use crate::message::{Message as DagMessage, MessageId, ProcessId};
use crate::sets::is_strict_majority;

use super::wire::{Phase, PhaseAck, TickEnd, TickStart, Vertex};
use super::{CLOCK_POOL, VALIDATORS_POOL};

/// Key under which the harness stashes the run's `Config` before building
/// the simulation; `anykv` works outside simulation context, so this can
/// happen before `SimulationBuilder::build` assigns any `dscale::ProcessId`s.
pub const CONFIG_KEY: &str = "vdf_dag/config";

/// Key under which run-wide counters accumulate. A `Simulation` never hands
/// its processes back to the caller, so this is the only channel a harness
/// has for aggregate stats once `run()` returns.
pub const STATS_KEY: &str = "vdf_dag/stats";

#[derive(Clone, Copy, Default, Debug)]
pub struct Stats {
    pub released: u64,
    pub rejected: u64,
    pub safety_violations: u64,
    pub view_incomplete: u64,
}

fn bump(f: impl FnOnce(&mut Stats)) {
    anykv::modify::<Stats>(STATS_KEY, f);
}

struct Decision {
    round: u64,
    coffer: BTreeSet<MessageId>,
}

pub struct VdfProcess {
    id: ProcessId,
    byzantine: bool,
    t_wb: u64,
    period: u64,
    well_behaved: BTreeSet<ProcessId>,
    dag: Dag,
    counter: u64,
    pending: Option<DagMessage>,
    pending_release_tick: u64,
    next_start_tick: u64,
    view_incomplete: u64,
    safety_violations: u64,
    adversary: Box<dyn AdversaryOracle>,
}

impl Default for VdfProcess {
    fn default() -> Self {
        Self {
            id: 0,
            byzantine: false,
            t_wb: 1,
            period: 1,
            well_behaved: BTreeSet::new(),
            dag: Dag::new(),
            counter: 0,
            pending: None,
            pending_release_tick: 0,
            next_start_tick: 0,
            view_incomplete: 0,
            safety_violations: 0,
            adversary: Box::new(DefaultAdversary),
        }
    }
}

impl ProcessHandle for VdfProcess {
    fn start(&mut self) {
        let config: Config = anykv::get(CONFIG_KEY);
        let validators = list_pool(VALIDATORS_POOL);
        let idx = validators
            .iter()
            .position(|&r| r == rank())
            .expect("vdf process started outside the validators pool");
        self.id = *config
            .processes
            .iter()
            .nth(idx)
            .expect("fewer logical process ids than validators pool slots");
        self.byzantine = config.is_byzantine(self.id);
        self.t_wb = config.t_wb;
        self.period = config.period_for(self.id);
        self.well_behaved = config.well_behaved();
        debug_process!(
            "vdf process {} online (byzantine={}, period={})",
            self.id,
            self.byzantine,
            self.period
        );
    }

    fn on_message(&mut self, _from: DscaleProcessId, message: MessagePtr) {
        if let Some(ts) = message.try_as::<TickStart>() {
            self.on_tick_start(ts.0);
        } else if let Some(te) = message.try_as::<TickEnd>() {
            self.on_tick_end(te.0);
        } else if let Some(v) = message.try_as::<Vertex>() {
            self.on_vertex((*v.0).clone());
        }
    }

    fn on_timer(&mut self, _id: TimerId) {}
}

impl VdfProcess {
    fn on_vertex(&mut self, m: DagMessage) {
        if self.dag.try_insert(m).is_err() {
            self.dag.record_rejection();
            bump(|s| s.rejected += 1);
        }
    }

    fn on_tick_start(&mut self, tick: u64) {
        self.start_vdf(tick);
        self.ack(tick, Phase::Start);
    }

    fn on_tick_end(&mut self, tick: u64) {
        if self.pending.is_some() && tick == self.pending_release_tick {
            self.release_pending();
        }
        self.ack(tick, Phase::End);
    }

    fn ack(&self, tick: u64, phase: Phase) {
        let clock = list_pool(CLOCK_POOL)[0];
        send_to(clock, PhaseAck { tick, phase });
    }

    fn start_vdf(&mut self, tick: u64) {
        if self.pending.is_some() || tick < self.next_start_tick {
            return;
        }
        if !self.byzantine && tick % self.period != 0 {
            return;
        }

        let decision = if self.byzantine {
            Ok(self.decide_byzantine())
        } else {
            self.decide_well_behaved(tick)
        };

        match decision {
            Ok(d) => {
                let prospective_id = MessageId::new(self.id, self.counter + 1);
                if !self.byzantine {
                    if let Err(e) = self.check_safety(prospective_id, &d) {
                        self.safety_violations += 1;
                        bump(|s| s.safety_violations += 1);
                        log::error!(
                            "{e}; this refutes the rate assumption or is an implementation bug"
                        );
                        std::process::exit(1);
                    }
                }
                self.counter += 1;
                let msg = DagMessage {
                    id: prospective_id,
                    round: d.round,
                    coffer: d.coffer,
                };
                debug_process!("starting vdf over round {} message {}", msg.round, msg.id);
                self.pending = Some(msg);
                self.pending_release_tick = tick + self.period - 1;
                self.next_start_tick = tick + self.period;
            }
            Err(e) => {
                self.view_incomplete += 1;
                bump(|s| s.view_incomplete += 1);
                debug_process!("deferring round start: {e}");
                self.next_start_tick = tick + 1;
            }
        }
    }

    fn release_pending(&mut self) {
        let Some(msg) = self.pending.take() else {
            return;
        };
        debug_process!("releasing round {} message {}", msg.round, msg.id);
        let shared = Rc::new(msg.clone());
        if self.dag.try_insert(msg).is_err() {
            self.dag.record_rejection();
            bump(|s| s.rejected += 1);
        }
        bump(|s| s.released += 1);
        broadcast_within_pool(VALIDATORS_POOL, Vertex(shared));
    }

    /// Round 0 is the unconditional genesis message. For round `r > 0` the
    /// coffer names every message this process has seen at round `r - 1`,
    /// provided the view there is complete: one message from every
    /// well-behaved process, and nothing still unresolved.
    fn decide_well_behaved(&self, tick: u64) -> Result<Decision, ConsensusError> {
        let current_round = tick / self.t_wb;
        if current_round == 0 {
            return Ok(Decision {
                round: 0,
                coffer: BTreeSet::new(),
            });
        }

        let pred_round = current_round - 1;
        let view_incomplete = || ConsensusError::ViewIncomplete {
            process: self.id,
            round: current_round,
        };
        if !self.dag.is_complete() {
            return Err(view_incomplete());
        }
        for w in &self.well_behaved {
            if !self.dag.at_round(pred_round).any(|m| m.id.process == *w) {
                return Err(view_incomplete());
            }
        }

        let coffer: BTreeSet<MessageId> = self.dag.at_round(pred_round).map(|m| m.id).collect();
        Ok(Decision {
            round: current_round,
            coffer,
        })
    }

    /// Byzantine processes have no liveness or safety obligation; round and
    /// coffer are whatever the injected oracle returns. The oracle is handed
    /// ids at `max_seen_round - 1`, the predecessor layer for a message that
    /// stays at `max_seen_round` (the default, least-adversarial choice) —
    /// not at `max_seen_round` itself, which would make its own message its
    /// own predecessor and fail the round check on every process that sees it.
    fn decide_byzantine(&mut self) -> Decision {
        let max_seen_round = self.dag.max_round().unwrap_or(0);
        let known_at_pred: BTreeSet<MessageId> = if max_seen_round == 0 {
            BTreeSet::new()
        } else {
            self.dag.at_round(max_seen_round - 1).map(|m| m.id).collect()
        };
        let (round, coffer) = self.adversary.choose_coffer(&known_at_pred, max_seen_round);
        Decision { round, coffer }
    }

    /// A well-behaved process may only start a VDF over a coffer that names
    /// every well-behaved message at the predecessor round, and carries a
    /// strict majority of that coffer. Violating this would let a fork
    /// split well-behaved weight against itself.
    fn check_safety(&self, id: MessageId, decision: &Decision) -> Result<(), ConsensusError> {
        if decision.round == 0 {
            return Ok(());
        }
        let pred_round = decision.round - 1;
        let wb_at_pred: BTreeSet<MessageId> = self
            .dag
            .at_round(pred_round)
            .filter(|m| self.well_behaved.contains(&m.id.process))
            .map(|m| m.id)
            .collect();
        if wb_at_pred.is_subset(&decision.coffer)
            && is_strict_majority(wb_at_pred.len(), decision.coffer.len())
        {
            Ok(())
        } else {
            Err(ConsensusError::SafetyViolation {
                id,
                round: decision.round,
            })
        }
    }

    pub fn logical_id(&self) -> ProcessId {
        self.id
    }

    pub fn is_byzantine(&self) -> bool {
        self.byzantine
    }

    pub fn is_safe(&self) -> bool {
        self.safety_violations == 0
    }

    pub fn view_incomplete_count(&self) -> u64 {
        self.view_incomplete
    }

    pub fn rejected_count(&self) -> u64 {
        self.dag.rejected_count()
    }

    pub fn accepted_view(&self) -> BTreeSet<MessageId> {
        crate::accepted::accepted(&self.dag.snapshot())
    }

    pub fn heaviest_chain(&self) -> Option<crate::message::Chain> {
        let chains = crate::enumeration::consistent_chains(&self.dag.snapshot());
        crate::selection::heaviest_consistent_chain(&chains)
    }

    pub fn dag_len(&self) -> usize {
        self.dag.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn process_with(id: ProcessId, well_behaved: &[ProcessId], t_wb: u64) -> VdfProcess {
        let mut p = VdfProcess::default();
        p.id = id;
        p.t_wb = t_wb;
        p.period = t_wb;
        p.well_behaved = well_behaved.iter().copied().collect();
        p
    }

    fn insert(p: &mut VdfProcess, process: ProcessId, counter: u64, round: u64, coffer: &[(ProcessId, u64)]) {
        let m = DagMessage {
            id: MessageId::new(process, counter),
            round,
            coffer: coffer.iter().map(|&(pr, c)| MessageId::new(pr, c)).collect(),
        };
        p.dag.try_insert(m).unwrap();
    }

    #[test]
    fn round_zero_is_the_unconditional_genesis() {
        let p = process_with(1, &[1, 2, 3], 3);
        let d = p.decide_well_behaved(0).unwrap();
        assert_eq!(d.round, 0);
        assert!(d.coffer.is_empty());
    }

    #[test]
    fn refuses_to_start_without_a_full_well_behaved_layer() {
        let mut p = process_with(1, &[1, 2, 3], 3);
        insert(&mut p, 1, 0, 0, &[]);
        insert(&mut p, 2, 0, 0, &[]);
        // process 3's round-0 message never arrives.
        assert!(p.decide_well_behaved(3).is_err());
    }

    #[test]
    fn builds_a_majority_coffer_once_the_view_is_complete() {
        let mut p = process_with(1, &[1, 2, 3], 3);
        insert(&mut p, 1, 0, 0, &[]);
        insert(&mut p, 2, 0, 0, &[]);
        insert(&mut p, 3, 0, 0, &[]);
        let d = p.decide_well_behaved(3).unwrap();
        assert_eq!(d.round, 1);
        assert_eq!(d.coffer.len(), 3);
        assert!(p.check_safety(MessageId::new(1, 1), &d).is_ok());
    }

    #[test]
    fn safety_check_fails_a_coffer_missing_a_well_behaved_member() {
        let p = process_with(1, &[1, 2, 3], 3);
        let d = Decision {
            round: 1,
            coffer: BTreeSet::from([MessageId::new(1, 0)]),
        };
        let id = MessageId::new(1, 1);
        assert!(p.check_safety(id, &d).is_err());
    }

    struct SkipRoundAdversary;
    impl AdversaryOracle for SkipRoundAdversary {
        fn choose_coffer(
            &mut self,
            _known_at_predecessor_round: &BTreeSet<MessageId>,
            max_seen_round: u64,
        ) -> (u64, BTreeSet<MessageId>) {
            (max_seen_round + 1, BTreeSet::new())
        }
    }

    #[test]
    fn byzantine_decision_defers_entirely_to_the_oracle() {
        let mut p = process_with(9, &[1, 2, 3], 3);
        p.byzantine = true;
        p.adversary = Box::new(SkipRoundAdversary);
        insert(&mut p, 1, 0, 0, &[]);
        let d = p.decide_byzantine();
        assert_eq!(d.round, 1);
        assert!(d.coffer.is_empty());
    }
}
