use average::{Estimate, Mean};
use serde::Serialize;

use crate::core::{Occupant, Pid, Process, SimError, SimResult, Ticks, Trace};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRow {
    pub pid: Pid,
    pub name: String,
    pub arrival: Ticks,
    pub burst: Ticks,
    pub start: Ticks,
    pub completion: Ticks,
    pub turnaround: Ticks,
    pub waiting: Ticks,
    pub response: Ticks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub avg_turnaround: f64,
    pub avg_waiting: f64,
    pub avg_response: f64,
    pub cpu_utilization: f64,
    pub throughput: f64,
    pub fairness_index: f64,
    pub context_switches: usize,
    pub total_time: Ticks,
    pub idle_time: Ticks,
    pub total_processes: usize,
    pub processes: Vec<ProcessRow>,
}

#[derive(Debug, Clone, Copy)]
pub struct Metrics<'a> {
    processes: &'a [Process],
    trace: &'a Trace,
}

impl<'a> Metrics<'a> {
    pub fn new(processes: &'a [Process], trace: &'a Trace) -> Self {
        Self { processes, trace }
    }

    fn mean_of(&self, f: impl Fn(&Process) -> Option<Ticks>) -> SimResult<f64> {
        if self.processes.is_empty() {
            return Ok(0.0);
        }
        let values = self
            .processes
            .iter()
            .map(|p| f(p).map(|v| v as f64).ok_or(SimError::IncompleteProcess(p.pid)))
            .collect::<SimResult<Vec<f64>>>()?;
        Ok(values.into_iter().collect::<Mean>().estimate())
    }

    pub fn average_turnaround(&self) -> SimResult<f64> {
        self.mean_of(Process::turnaround)
    }

    pub fn average_waiting(&self) -> SimResult<f64> {
        self.mean_of(Process::waiting)
    }

    pub fn average_response(&self) -> SimResult<f64> {
        self.mean_of(Process::response)
    }

    pub fn cpu_utilization(&self) -> f64 {
        self.trace.utilization()
    }

    pub fn throughput(&self) -> f64 {
        let completed = self
            .processes
            .iter()
            .filter(|p| p.completion_time.is_some())
            .count();
        let total = self.trace.total_time();
        if completed == 0 || total == 0 {
            return 0.0;
        }
        completed as f64 / total as f64
    }

    // Jain's index over waiting times; 1.0 when every wait is zero
    pub fn fairness_index(&self) -> SimResult<f64> {
        let n = self.processes.len();
        if n == 0 {
            return Ok(1.0);
        }

        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        for process in self.processes {
            let w = process
                .waiting()
                .ok_or(SimError::IncompleteProcess(process.pid))? as f64;
            sum += w;
            sum_sq += w * w;
        }

        if sum_sq == 0.0 {
            return Ok(1.0);
        }
        Ok(sum * sum / (n as f64 * sum_sq))
    }

    // P1 -> idle -> P2 is not a switch
    pub fn context_switches(&self) -> usize {
        self.trace
            .entries()
            .windows(2)
            .filter(|pair| match (pair[0].occupant, pair[1].occupant) {
                (Occupant::Process(a), Occupant::Process(b)) => a != b,
                _ => false,
            })
            .count()
    }

    pub fn total_time(&self) -> Ticks {
        self.trace.total_time()
    }

    pub fn total_processes(&self) -> usize {
        self.processes.len()
    }

    pub fn validate_records(&self) -> SimResult<()> {
        for p in self.processes {
            match (p.start_time, p.completion_time) {
                (Some(start), Some(completion))
                    if start >= p.arrival && completion >= start => {}
                _ => return Err(SimError::IncompleteProcess(p.pid)),
            }
        }
        Ok(())
    }

    // Arrival order, PID tie-break
    pub fn rows(&self) -> SimResult<Vec<ProcessRow>> {
        let mut ordered: Vec<&Process> = self.processes.iter().collect();
        ordered.sort_by_key(|p| p.arrival_key());

        ordered
            .into_iter()
            .map(|p| {
                let incomplete = SimError::IncompleteProcess(p.pid);
                let (Some(start), Some(completion), Some(m)) =
                    (p.start_time, p.completion_time, p.metrics)
                else {
                    return Err(incomplete);
                };
                Ok(ProcessRow {
                    pid: p.pid,
                    name: p.name.clone(),
                    arrival: p.arrival,
                    burst: p.burst,
                    start,
                    completion,
                    turnaround: m.turnaround,
                    waiting: m.waiting,
                    response: m.response,
                })
            })
            .collect()
    }

    pub fn report(&self) -> SimResult<Report> {
        self.trace.validate()?;

        Ok(Report {
            avg_turnaround: self.average_turnaround()?,
            avg_waiting: self.average_waiting()?,
            avg_response: self.average_response()?,
            cpu_utilization: self.cpu_utilization(),
            throughput: self.throughput(),
            fairness_index: self.fairness_index()?,
            context_switches: self.context_switches(),
            total_time: self.total_time(),
            idle_time: self.trace.idle_time(),
            total_processes: self.total_processes(),
            processes: self.rows()?,
        })
    }
}
