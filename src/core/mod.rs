pub mod engine;
pub mod error;
pub mod observer;
pub mod state;
pub mod trace;

pub use engine::{Engine, LoadReport};
pub use error::{DescriptorError, SimError, SimResult, TraceError};
pub use state::{Pid, Process, ProcessMetrics, ProcessSpec, ProcessState, Ticks};
pub use trace::{Occupant, Trace, TraceEntry};
