mod actor;
mod alloc;
mod destination;
mod dscale_message;
pub mod global;
pub mod helpers;
mod message;
mod network;
mod nursery;
mod process_handle;
mod progress;
mod random;
mod simulation;
mod simulation_builder;
pub mod time;
mod topology;

pub use destination::Destination;
pub use message::{Message, MessagePtr};

pub use process_handle::ProcessHandle;
pub use process_handle::ProcessId;

pub use simulation::Simulation;
pub use simulation_builder::SimulationBuilder;

pub use global::broadcast;
pub use global::broadcast_within_pool;
pub use global::choose_from_pool;
pub use global::global_unique_id;
pub use global::list_pool;
pub use global::now;
pub use global::rank;
pub use global::schedule_timer_after;
pub use global::send_random_from_pool;
pub use global::send_to;

pub use network::BandwidthDescription;

pub use topology::LatencyDescription;

pub use random::Distributions;

pub use time::Jiffies;
pub use time::TimerId;
