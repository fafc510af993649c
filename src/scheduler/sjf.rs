use log::debug;

use super::{Policy, Step};
use crate::core::Engine;

#[derive(Debug, Default)]
pub struct SjfScheduler;

impl SjfScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Policy for SjfScheduler {
    fn name(&self) -> &'static str {
        "SJF"
    }

    fn preemptive(&self) -> bool {
        false
    }

    fn step(&mut self, engine: &mut Engine) -> Step {
        let now = engine.now();
        let chosen = engine
            .ready_at(now)
            .min_by_key(|p| p.remaining_key())
            .map(|p| (p.pid, p.remaining));

        match chosen {
            Some((pid, remaining)) => {
                debug!("SJF: t={now} picked P{pid} (burst {remaining})");
                engine.dispatch(pid, remaining);
                Step::Continue
            }
            None if engine.idle_until_next_arrival() => Step::Continue,
            None => Step::Done,
        }
    }
}
