//! Wires a `Config` into a runnable `dscale` simulation.
//!
//! `dscale` assigns its own `ProcessId`s at pool-construction time and
//! builds each process via `Default`, with no way to pass per-instance
//! state through `add_pool`. The fix is the same `anykv` side channel the
//! corpus uses for run-wide scratch state: the `Config` is stashed there
//! before the pools are built, and `VdfProcess::start` recovers its own
//! logical id and Byzantine-ness by locating its rank's position in the
//! validators pool and mapping that position onto `Config.processes`
//! (a `BTreeSet`, so the mapping is deterministic and independent of pool
//! build order).

use dscale::global::anykv;
use dscale::{BandwidthDescription, Distributions, Jiffies, LatencyDescription, Simulation, SimulationBuilder};

use crate::config::Config;
use crate::process::{CLOCK_POOL, CONFIG_KEY, ClockProcess, STATS_KEY, Stats, VALIDATORS_POOL, VdfProcess};

/// Network shape for a run: symmetric latency within the validators pool
/// and between validators and the clock, plus a per-process bandwidth cap.
pub struct NetworkProfile {
    pub latency: Distributions,
    pub bandwidth: BandwidthDescription,
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self {
            latency: Distributions::Uniform(Jiffies(1), Jiffies(1)),
            bandwidth: BandwidthDescription::Unbounded,
        }
    }
}

/// Builds a `Simulation` for `config`, ready to `run()`.
///
/// `config.validate()` is the caller's responsibility; this only wires
/// topology, it doesn't re-check the rate invariant.
pub fn build_simulation(config: Config, seed: u64, network: NetworkProfile) -> Simulation {
    anykv::set(CONFIG_KEY, config.clone());
    anykv::set(STATS_KEY, Stats::default());

    let validators = config.processes.len();
    let time_budget = config
        .max_tick
        .map(|t| Jiffies(t as usize))
        .unwrap_or(Jiffies(1_000_000));

    SimulationBuilder::default()
        .seed(seed)
        .time_budget(time_budget)
        .add_pool::<ClockProcess>(CLOCK_POOL, 1)
        .add_pool::<VdfProcess>(VALIDATORS_POOL, validators)
        .latency_topology(&[
            LatencyDescription::WithinPool(VALIDATORS_POOL, network.latency),
            LatencyDescription::BetweenPools(CLOCK_POOL, VALIDATORS_POOL, network.latency),
        ])
        .nic_bandwidth(network.bandwidth)
        .build()
}
