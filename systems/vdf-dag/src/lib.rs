//! A Byzantine-fault-tolerant DAG consensus core: vertices are admitted
//! through a `Dag`, the chain algebra in `consistency`/`enumeration`/
//! `selection`/`accepted` decides what's safe to build on, and `process`
//! realizes the round/tick state machine that actually produces vertices
//! over `dscale`.
//!
//! Everything above `process` is plain, `dscale`-free Rust operating on
//! `Vec<Message>`/`Dag` snapshots, so it can be driven directly from unit
//! and property tests without a simulation in the loop.

pub mod accepted;
pub mod adversary;
pub mod config;
pub mod consistency;
pub mod dag;
pub mod enumeration;
pub mod error;
pub mod harness;
pub mod message;
pub mod process;
pub mod selection;
pub mod sets;

pub use config::Config;
pub use dag::Dag;
pub use error::ConsensusError;
pub use message::{Chain, Message, MessageId, ProcessId};
