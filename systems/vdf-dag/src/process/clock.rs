use dscale::helpers::{Combiner, debug_process};
use dscale::{MessagePtr, ProcessHandle, ProcessId, TimerId, broadcast_within_pool, list_pool, now, rank};

use super::wire::{Phase, PhaseAck, TickEnd, TickStart};
use super::VALIDATORS_POOL;

/// Owns the global tick and phase, and refuses to advance until every
/// validator has acked the current phase: a strict barrier realized with
/// `dscale`'s `Combiner` quorum collector.
pub struct ClockProcess {
    tick: u64,
    phase: Phase,
    acks: Combiner<ProcessId>,
}

impl Default for ClockProcess {
    fn default() -> Self {
        Self {
            tick: 0,
            phase: Phase::Start,
            acks: Combiner::new(1),
        }
    }
}

impl ProcessHandle for ClockProcess {
    fn start(&mut self) {
        let quorum = list_pool(VALIDATORS_POOL).len().max(1);
        self.acks = Combiner::new(quorum);
        debug_process!("clock starting with {quorum} validators");
        broadcast_within_pool(VALIDATORS_POOL, TickStart(self.tick));
    }

    fn on_message(&mut self, from: ProcessId, message: MessagePtr) {
        let Some(ack) = message.try_as::<PhaseAck>() else {
            return;
        };
        if ack.tick != self.tick || ack.phase != self.phase {
            return;
        }
        if self.acks.combine(from).is_some() {
            self.advance();
        }
    }

    fn on_timer(&mut self, _id: TimerId) {}
}

impl ClockProcess {
    fn advance(&mut self) {
        let quorum = list_pool(VALIDATORS_POOL).len().max(1);
        match self.phase {
            Phase::Start => {
                self.phase = Phase::End;
                self.acks = Combiner::new(quorum);
                debug_process!("tick {} entering end phase", self.tick);
                broadcast_within_pool(VALIDATORS_POOL, TickEnd(self.tick));
            }
            Phase::End => {
                self.tick += 1;
                self.phase = Phase::Start;
                self.acks = Combiner::new(quorum);
                debug_process!("tick {} starting", self.tick);
                broadcast_within_pool(VALIDATORS_POOL, TickStart(self.tick));
            }
        }
    }
}
