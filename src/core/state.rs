use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::DescriptorError;

pub type Pid = u32;
pub type Ticks = u64;

// Signed so out-of-range input survives until validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSpec {
    pub pid: i64,
    pub arrival: i64,
    pub burst: i64,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl ProcessSpec {
    pub fn new(pid: i64, arrival: i64, burst: i64) -> Self {
        Self {
            pid,
            arrival,
            burst,
            priority: 0,
            name: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.pid < 0 {
            return Err(DescriptorError::NegativePid(self.pid));
        }
        if self.pid > i64::from(Pid::MAX) {
            return Err(DescriptorError::PidOutOfRange(self.pid));
        }
        if self.arrival < 0 {
            return Err(DescriptorError::NegativeArrival {
                pid: self.pid,
                arrival: self.arrival,
            });
        }
        if self.burst <= 0 {
            return Err(DescriptorError::NonPositiveBurst {
                pid: self.pid,
                burst: self.burst,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    // Never dispatched
    Waiting,
    // Dispatched at least once, work remaining
    Started,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProcessMetrics {
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub pid: Pid,
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub priority: i32,
    pub remaining: Ticks,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
    pub metrics: Option<ProcessMetrics>,
}

impl Process {
    pub fn from_spec(spec: &ProcessSpec) -> Result<Self, DescriptorError> {
        spec.validate()?;

        let pid = spec.pid as Pid;
        let name = match &spec.name {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("P{pid}"),
        };

        Ok(Self {
            pid,
            name,
            arrival: spec.arrival as Ticks,
            burst: spec.burst as Ticks,
            priority: spec.priority,
            remaining: spec.burst as Ticks,
            start_time: None,
            completion_time: None,
            metrics: None,
        })
    }

    pub fn has_started(&self) -> bool {
        self.start_time.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn has_arrived(&self, time: Ticks) -> bool {
        self.arrival <= time
    }

    pub fn state(&self) -> ProcessState {
        if self.is_complete() {
            ProcessState::Completed
        } else if self.has_started() {
            ProcessState::Started
        } else {
            ProcessState::Waiting
        }
    }

    pub fn derive_metrics(&self) -> Option<ProcessMetrics> {
        let start = self.start_time?;
        let completion = self.completion_time?;

        let turnaround = completion.checked_sub(self.arrival)?;
        Some(ProcessMetrics {
            turnaround,
            waiting: turnaround.checked_sub(self.burst)?,
            response: start.checked_sub(self.arrival)?,
        })
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        self.metrics.map(|m| m.turnaround)
    }

    pub fn waiting(&self) -> Option<Ticks> {
        self.metrics.map(|m| m.waiting)
    }

    pub fn response(&self) -> Option<Ticks> {
        self.metrics.map(|m| m.response)
    }

    // Order every policy admits in
    pub fn arrival_key(&self) -> (Ticks, Pid) {
        (self.arrival, self.pid)
    }

    pub fn remaining_key(&self) -> (Ticks, Pid) {
        (self.remaining, self.pid)
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}(PID:{}, Arrival:{}, Burst:{}",
            self.name, self.pid, self.arrival, self.burst
        )?;
        if self.priority != 0 {
            write!(f, ", Priority:{}", self.priority)?;
        }
        write!(f, ")")
    }
}
