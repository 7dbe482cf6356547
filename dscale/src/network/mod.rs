mod bandwidth;
mod latency;

use std::cell::RefCell;
use std::rc::Rc;

pub use bandwidth::BandwidthDescription;
pub(crate) use bandwidth::BandwidthQueue;
pub(crate) use latency::LatencyQueue;
use log::debug;

use crate::Destination;
use crate::Message;
use crate::MessagePtr;
use crate::ProcessId;
use crate::actor::EventSubmitter;
use crate::actor::SimulationActor;
use crate::dscale_message::DScaleMessage;
use crate::global::configuration;
use crate::message::ProcessStep;
use crate::message::RoutedMessage;
use crate::now;
use crate::nursery::Nursery;
use crate::random::Randomizer;
use crate::random::Seed;
use crate::time::Jiffies;
use crate::topology::Topology;

pub(crate) type NetworkActor = Rc<RefCell<Network>>;

pub(crate) struct Network {
    seed: Seed,
    bandwidth_queue: BandwidthQueue,
    topology: Rc<Topology>,
    nursery: Rc<Nursery>,
}

impl Network {
    fn submit_single_message(
        &mut self,
        message: Rc<dyn Message>,
        source: ProcessId,
        destination: Destination,
    ) {
        let targets = match destination {
            Destination::Broadcast => self.nursery.keys().copied().collect::<Vec<ProcessId>>(),
            Destination::BroadcastWithinPool(pool_name) => {
                self.topology.list_pool(pool_name).to_vec()
            }
            Destination::To(to) => vec![to],
        };

        debug!("Submitting message from {source}, targets of the message: {targets:?}",);

        targets.into_iter().for_each(|target| {
            let routed_message = RoutedMessage {
                arrival_time: now() + Jiffies(1), // Without any latency message will arrive on next timepoint;
                step: ProcessStep {
                    source,
                    dest: target,
                    message: message.clone(),
                },
            };
            self.bandwidth_queue.push(routed_message);
        });
    }

    fn execute_process_step(&mut self, step: ProcessStep) {
        let source = step.source;
        let dest = step.dest;
        let message = step.message;

        self.nursery.deliver(
            source,
            dest,
            DScaleMessage::NetworkMessage(MessagePtr(message)),
        );
    }
}

impl Network {
    pub(crate) fn new(
        seed: Seed,
        bandwidth_type: BandwidthDescription,
        topology: Rc<Topology>,
        nursery: Rc<Nursery>,
    ) -> Self {
        Self {
            seed,
            bandwidth_queue: BandwidthQueue::new(
                bandwidth_type,
                nursery.size(),
                LatencyQueue::new(Randomizer::new(seed), topology.clone()),
            ),
            topology,
            nursery,
        }
    }
}

impl SimulationActor for Network {
    fn start(&mut self) {
        self.nursery.keys().for_each(|id| {
            configuration::setup_local_configuration(*id, self.seed);
            self.nursery.start_single(*id);
        });
    }

    fn step(&mut self) {
        let next_event = self.bandwidth_queue.pop();

        match next_event {
            None => {}
            Some(message) => {
                self.execute_process_step(message.step);
            }
        }
    }

    fn peek_closest(&self) -> Option<Jiffies> {
        self.bandwidth_queue.peek_closest()
    }
}

impl EventSubmitter for Network {
    type Event = (ProcessId, Destination, Rc<dyn Message>);

    fn submit(&mut self, events: &mut Vec<Self::Event>) {
        events.drain(..).for_each(|(from, destination, message)| {
            self.submit_single_message(message, from, destination);
        });
    }
}
