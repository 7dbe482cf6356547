//! Wire messages exchanged over `dscale`'s transport. Concrete wire
//! encoding is out of scope; `virtual_size` is an estimate for the
//! bandwidth model, covering the fixed-width id/round fields plus one id
//! per coffer entry.

use std::rc::Rc;

use dscale::Message as WireMessage;

use crate::message::Message as DagMessage;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Start,
    End,
}

pub struct TickStart(pub u64);
impl WireMessage for TickStart {
    fn virtual_size(&self) -> usize {
        8
    }
}

pub struct TickEnd(pub u64);
impl WireMessage for TickEnd {
    fn virtual_size(&self) -> usize {
        8
    }
}

pub struct PhaseAck {
    pub tick: u64,
    pub phase: Phase,
}
impl WireMessage for PhaseAck {
    fn virtual_size(&self) -> usize {
        9
    }
}

/// A produced DAG vertex, broadcast once its VDF elapses.
pub struct Vertex(pub Rc<DagMessage>);
impl WireMessage for Vertex {
    fn virtual_size(&self) -> usize {
        // id + round + one id per coffer entry, all fixed-width estimates.
        16 + self.0.coffer.len() * 16
    }
}
