use std::collections::VecDeque;

use log::debug;

use super::{Policy, Step};
use crate::core::{Engine, Pid};

#[derive(Debug, Default)]
pub struct FcfsScheduler {
    queue: VecDeque<Pid>,
}

impl FcfsScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Policy for FcfsScheduler {
    fn name(&self) -> &'static str {
        "FCFS"
    }

    fn preemptive(&self) -> bool {
        false
    }

    fn init(&mut self, engine: &Engine) {
        self.queue = engine.arrival_order().into();
    }

    fn step(&mut self, engine: &mut Engine) -> Step {
        let Some(pid) = self.queue.pop_front() else {
            return Step::Done;
        };
        let Some(process) = engine.find_by_pid(pid) else {
            return Step::Continue;
        };
        if process.is_complete() {
            return Step::Continue;
        }

        let (arrival, remaining) = (process.arrival, process.remaining);
        // CPU sits idle until the head of the queue shows up
        engine.advance_to(arrival);

        debug!("FCFS: t={} running P{pid} to completion", engine.now());
        engine.dispatch(pid, remaining);
        Step::Continue
    }
}
