//! Error taxonomy. `ConfigError` and `SafetyViolation` are the
//! only variants that ever leave a process; `MessageMalformed` and
//! `ViewIncomplete` are constructed at their hot call sites (see
//! `dag::Dag::try_insert` and `process::vdf::VdfProcess::decide_well_behaved`)
//! but logged and tallied locally there rather than propagated further.

use thiserror::Error;

use crate::message::MessageId;

#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("invalid configuration: {reason}")]
    ConfigError { reason: String },

    #[error("message {id} malformed: {reason}")]
    MessageMalformed { id: MessageId, reason: String },

    #[error("process {process} has no valid view to start round {round}")]
    ViewIncomplete { process: u64, round: u64 },

    #[error("safety violation: pending message {id} does not carry a well-behaved majority of round {round}")]
    SafetyViolation { id: MessageId, round: u64 },
}
