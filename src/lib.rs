pub mod config;
pub mod core;
pub mod metrics;
pub mod scheduler;
pub mod sim;

pub use config::{LoadMode, SimConfig};
pub use crate::core::{Engine, Pid, Process, ProcessSpec, SimError, Ticks, Trace};
pub use metrics::{Metrics, Report};
pub use scheduler::{Policy, PolicyKind, create_policy};
pub use sim::{RunOutcome, Sim};
