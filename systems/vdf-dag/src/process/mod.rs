//! Round/tick state machine, realized as two `dscale`
//! processes: a tick-barrier `ClockProcess` and a per-rank `VdfProcess`.
//! This is the "single-threaded cooperative" embedding the model calls out,
//! driven entirely through `start`/`on_message`/`on_timer` like any other
//! `dscale` process.

mod clock;
mod vdf;
mod wire;

pub use clock::ClockProcess;
pub use vdf::{CONFIG_KEY, STATS_KEY, Stats, VdfProcess};

pub const CLOCK_POOL: &str = "clock";
pub const VALIDATORS_POOL: &str = "validators";
