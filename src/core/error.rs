use thiserror::Error;

use super::state::{Pid, Ticks};

pub type SimResult<T> = Result<T, SimError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("PID cannot be negative: {0}")]
    NegativePid(i64),

    #[error("PID out of range: {0}")]
    PidOutOfRange(i64),

    #[error("process {pid}: arrival time cannot be negative ({arrival})")]
    NegativeArrival { pid: i64, arrival: i64 },

    #[error("process {pid}: burst time must be positive ({burst})")]
    NonPositiveBurst { pid: i64, burst: i64 },

    #[error("duplicate PID {0}")]
    DuplicatePid(Pid),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    #[error("trace entry {index} starts at {found}, expected {expected}")]
    Discontinuity {
        index: usize,
        expected: Ticks,
        found: Ticks,
    },

    #[error("trace entry {index} is empty")]
    EmptySpan { index: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    #[error("invalid process descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorError),

    #[error("workload does not fit the clock: latest arrival plus total burst exceeds {}", Ticks::MAX)]
    HorizonOverflow,

    #[error("unknown scheduling algorithm: {0}")]
    UnsupportedPolicy(String),

    #[error("time quantum must be positive, got {0}")]
    InvalidQuantum(Ticks),

    #[error("run did not converge: clock at {now} passed the {limit} tick ceiling")]
    NonConvergence { limit: Ticks, now: Ticks },

    #[error("policy made no progress for {steps} steps at tick {now}")]
    Stalled { steps: usize, now: Ticks },

    #[error("process {0} has no completion data")]
    IncompleteProcess(Pid),

    #[error("invalid trace: {0}")]
    InvalidTrace(#[from] TraceError),
}
