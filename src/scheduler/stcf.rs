use std::cmp::Ordering;

use keyed_priority_queue::KeyedPriorityQueue;
use log::debug;

use super::{ArrivalFeed, Policy, Step};
use crate::core::{Engine, Pid, Ticks};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Urgency {
    remaining: Ticks,
    pid: Pid,
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop Urgency's Ord
impl PartialOrd for Urgency {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Urgency {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.remaining, other.pid).cmp(&(self.remaining, self.pid))
    }
}

// Re-decided every tick
#[derive(Debug)]
pub struct StcfScheduler {
    arrivals: ArrivalFeed,
    ready: KeyedPriorityQueue<Pid, Urgency>,
}

impl Default for StcfScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl StcfScheduler {
    pub fn new() -> Self {
        Self {
            arrivals: ArrivalFeed::default(),
            ready: KeyedPriorityQueue::new(),
        }
    }

    fn admit(&mut self, engine: &Engine) {
        for pid in self.arrivals.admit(engine.now()) {
            if let Some(remaining) = engine.remaining(pid).filter(|&r| r > 0) {
                self.ready.push(pid, Urgency { remaining, pid });
            }
        }
    }
}

impl Policy for StcfScheduler {
    fn name(&self) -> &'static str {
        "STCF"
    }

    fn preemptive(&self) -> bool {
        true
    }

    fn init(&mut self, engine: &Engine) {
        self.arrivals = ArrivalFeed::new(engine);
        self.ready = KeyedPriorityQueue::new();
    }

    fn step(&mut self, engine: &mut Engine) -> Step {
        self.admit(engine);

        let Some((&pid, _)) = self.ready.peek() else {
            return match self.arrivals.next_arrival() {
                Some(arrival) => {
                    engine.advance_to(arrival);
                    Step::Continue
                }
                None => Step::Done,
            };
        };

        engine.dispatch(pid, 1);

        match engine.remaining(pid) {
            Some(0) | None => {
                self.ready.remove(&pid);
            }
            Some(remaining) => {
                self.ready.push(pid, Urgency { remaining, pid });
            }
        }
        debug!("STCF: t={} ran P{pid} for 1 tick", engine.now());
        Step::Continue
    }
}
