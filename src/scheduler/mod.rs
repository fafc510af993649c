pub mod fcfs;
pub mod round_robin;
pub mod sjf;
pub mod stcf;

use std::fmt;
use std::str::FromStr;

use log::{debug, info};
use serde::Serialize;

use crate::{
    config::SimConfig,
    core::{Engine, Pid, SimError, SimResult, Ticks},
};
pub use fcfs::FcfsScheduler;
pub use round_robin::RoundRobinScheduler;
pub use sjf::SjfScheduler;
pub use stcf::StcfScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    // Nothing ready and nothing left to arrive
    Done,
}

pub trait Policy {
    fn name(&self) -> &'static str;

    fn preemptive(&self) -> bool;

    fn init(&mut self, _engine: &Engine) {}

    fn step(&mut self, engine: &mut Engine) -> Step;

    fn schedule(&mut self, engine: &mut Engine) -> SimResult<()> {
        info!("Starting {} scheduling of {} processes", self.name(), engine.len());
        self.init(engine);

        // Each process can cost at most one no-progress step (stale queue skip)
        let stall_limit = engine.len() + 2;
        let mut stalled = 0;

        while !engine.all_complete() {
            let before = engine.progress_marker();
            if self.step(engine) == Step::Done {
                break;
            }

            if let Some(limit) = engine.max_ticks() {
                if engine.now() > limit {
                    return Err(SimError::NonConvergence {
                        limit,
                        now: engine.now(),
                    });
                }
            }

            if engine.progress_marker() == before {
                stalled += 1;
                if stalled > stall_limit {
                    return Err(SimError::Stalled {
                        steps: stalled,
                        now: engine.now(),
                    });
                }
            } else {
                stalled = 0;
            }
        }

        info!("{} scheduling completed at t={}", self.name(), engine.now());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Fcfs,
    Sjf,
    Stcf,
    RoundRobin { quantum: Ticks },
}

impl PolicyKind {
    pub const ALL_NAMES: [&'static str; 4] = ["fcfs", "sjf", "stcf", "rr"];

    pub fn all(quantum: Ticks) -> [PolicyKind; 4] {
        [
            Self::Fcfs,
            Self::Sjf,
            Self::Stcf,
            Self::RoundRobin { quantum },
        ]
    }

    pub fn parse(name: &str, config: &SimConfig) -> SimResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fcfs" | "fifo" => Ok(Self::Fcfs),
            "sjf" => Ok(Self::Sjf),
            "stcf" | "srtf" => Ok(Self::Stcf),
            "rr" => Ok(Self::RoundRobin {
                quantum: config.quantum,
            }),
            _ => Err(SimError::UnsupportedPolicy(name.to_string())),
        }
    }

    pub fn build(self) -> SimResult<Box<dyn Policy>> {
        debug!("Building {self} policy");
        Ok(match self {
            Self::Fcfs => Box::new(FcfsScheduler::new()),
            Self::Sjf => Box::new(SjfScheduler::new()),
            Self::Stcf => Box::new(StcfScheduler::new()),
            Self::RoundRobin { quantum } => Box::new(RoundRobinScheduler::new(quantum)?),
        })
    }
}

impl FromStr for PolicyKind {
    type Err = SimError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name, &SimConfig::default())
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fcfs => write!(f, "fcfs"),
            Self::Sjf => write!(f, "sjf"),
            Self::Stcf => write!(f, "stcf"),
            Self::RoundRobin { quantum } => write!(f, "rr(q={quantum})"),
        }
    }
}

pub fn create_policy(name: &str, config: &SimConfig) -> SimResult<Box<dyn Policy>> {
    PolicyKind::parse(name, config)?.build()
}

#[derive(Debug, Default)]
pub(crate) struct ArrivalFeed {
    pending: Vec<(Ticks, Pid)>,
    cursor: usize,
}

impl ArrivalFeed {
    pub(crate) fn new(engine: &Engine) -> Self {
        let mut pending: Vec<(Ticks, Pid)> =
            engine.processes().iter().map(|p| p.arrival_key()).collect();
        pending.sort_unstable();
        Self { pending, cursor: 0 }
    }

    pub(crate) fn admit(&mut self, time: Ticks) -> impl Iterator<Item = Pid> + '_ {
        let start = self.cursor;
        // Contiguous, since pending is sorted
        let arrived = self.pending[start..]
            .iter()
            .take_while(|(arrival, _)| *arrival <= time)
            .count();
        self.cursor += arrived;
        self.pending[start..start + arrived].iter().map(|&(_, pid)| pid)
    }

    pub(crate) fn next_arrival(&self) -> Option<Ticks> {
        self.pending.get(self.cursor).map(|&(arrival, _)| arrival)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_accepts_aliases() {
        let cfg = SimConfig::default();
        assert_eq!(PolicyKind::parse("fcfs", &cfg), Ok(PolicyKind::Fcfs));
        assert_eq!(PolicyKind::parse("FIFO", &cfg), Ok(PolicyKind::Fcfs));
        assert_eq!(PolicyKind::parse("sjf", &cfg), Ok(PolicyKind::Sjf));
        assert_eq!(PolicyKind::parse("srtf", &cfg), Ok(PolicyKind::Stcf));
        assert_eq!(
            PolicyKind::parse("rr", &cfg),
            Ok(PolicyKind::RoundRobin { quantum: 2 })
        );
    }

    #[test]
    fn selector_rejects_unknown() {
        assert_eq!(
            "lottery".parse::<PolicyKind>(),
            Err(SimError::UnsupportedPolicy("lottery".to_string()))
        );
        assert!(create_policy("mlfq", &SimConfig::default()).is_err());
    }

    #[test]
    fn zero_quantum_refused() {
        let cfg = SimConfig {
            quantum: 0,
            ..SimConfig::default()
        };
        assert_eq!(
            create_policy("rr", &cfg).err(),
            Some(SimError::InvalidQuantum(0))
        );
    }

    #[test]
    fn factory_names() {
        let cfg = SimConfig::default();
        for (name, expected) in [
            ("fcfs", "FCFS"),
            ("sjf", "SJF"),
            ("stcf", "STCF"),
            ("rr", "RR"),
        ] {
            assert_eq!(create_policy(name, &cfg).unwrap().name(), expected);
        }
    }
}
