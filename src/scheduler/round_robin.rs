use std::collections::VecDeque;

use log::debug;

use super::{ArrivalFeed, Policy, Step};
use crate::{
    config::DEFAULT_QUANTUM,
    core::{Engine, Pid, SimError, SimResult, Ticks},
};

// Arrivals during a turn queue ahead of the process that just yielded
#[derive(Debug)]
pub struct RoundRobinScheduler {
    quantum: Ticks,
    arrivals: ArrivalFeed,
    ready: VecDeque<Pid>,
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        Self {
            quantum: DEFAULT_QUANTUM,
            arrivals: ArrivalFeed::default(),
            ready: VecDeque::new(),
        }
    }
}

impl RoundRobinScheduler {
    pub fn new(quantum: Ticks) -> SimResult<Self> {
        if quantum == 0 {
            return Err(SimError::InvalidQuantum(quantum));
        }
        Ok(Self {
            quantum,
            ..Self::default()
        })
    }

    pub fn quantum(&self) -> Ticks {
        self.quantum
    }

    pub fn set_quantum(&mut self, quantum: Ticks) -> SimResult<()> {
        if quantum == 0 {
            return Err(SimError::InvalidQuantum(quantum));
        }
        self.quantum = quantum;
        Ok(())
    }

    fn enqueue_arrivals(&mut self, engine: &Engine) {
        self.ready.extend(self.arrivals.admit(engine.now()));
    }
}

impl Policy for RoundRobinScheduler {
    fn name(&self) -> &'static str {
        "RR"
    }

    fn preemptive(&self) -> bool {
        true
    }

    fn init(&mut self, engine: &Engine) {
        self.arrivals = ArrivalFeed::new(engine);
        self.ready.clear();
        self.enqueue_arrivals(engine);
    }

    fn step(&mut self, engine: &mut Engine) -> Step {
        let Some(pid) = self.ready.pop_front() else {
            return match self.arrivals.next_arrival() {
                Some(arrival) => {
                    engine.advance_to(arrival);
                    self.enqueue_arrivals(engine);
                    Step::Continue
                }
                None => Step::Done,
            };
        };

        let remaining = engine.remaining(pid).unwrap_or(0);
        if remaining == 0 {
            // Stale entry; skip without consuming a turn
            self.enqueue_arrivals(engine);
            return Step::Continue;
        }

        let slice = self.quantum.min(remaining);
        debug!("RR: t={} P{pid} gets {slice} ticks", engine.now());
        engine.dispatch(pid, slice);

        self.enqueue_arrivals(engine);
        if engine.remaining(pid).is_some_and(|r| r > 0) {
            self.ready.push_back(pid);
        }
        Step::Continue
    }
}
