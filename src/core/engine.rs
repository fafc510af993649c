use log::{debug, trace, warn};
use rustc_hash::FxHashMap;

use super::{
    error::{DescriptorError, SimError, SimResult},
    observer::Observer,
    state::{Pid, Process, ProcessSpec, Ticks},
    trace::{Occupant, Trace},
};
use crate::config::LoadMode;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub rejected: Vec<DescriptorError>,
}

#[derive(Debug, Default)]
pub struct Engine {
    now: Ticks,
    processes: Vec<Process>,
    // Pid --> processes[index]
    index: FxHashMap<Pid, usize>,
    descriptors: Vec<ProcessSpec>,
    trace: Trace,
    max_ticks: Option<Ticks>,
    observer: Observer,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_ticks(mut self, max_ticks: Option<Ticks>) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    pub fn set_max_ticks(&mut self, max_ticks: Option<Ticks>) {
        self.max_ticks = max_ticks;
    }

    pub fn max_ticks(&self) -> Option<Ticks> {
        self.max_ticks
    }

    // Strict: the first bad descriptor aborts and leaves the engine untouched
    pub fn load(&mut self, specs: &[ProcessSpec], mode: LoadMode) -> SimResult<LoadReport> {
        let mut processes = Vec::with_capacity(specs.len());
        let mut index = FxHashMap::default();
        let mut descriptors = Vec::with_capacity(specs.len());
        let mut report = LoadReport::default();

        for spec in specs {
            let built = Process::from_spec(spec).and_then(|p| {
                if index.contains_key(&p.pid) {
                    Err(DescriptorError::DuplicatePid(p.pid))
                } else {
                    Ok(p)
                }
            });

            match built {
                Ok(process) => {
                    index.insert(process.pid, processes.len());
                    processes.push(process);
                    descriptors.push(spec.clone());
                }
                Err(err) if mode == LoadMode::Strict => return Err(SimError::from(err)),
                Err(err) => {
                    warn!("Skipping process descriptor: {err}");
                    report.rejected.push(err);
                }
            }
        }

        // The clock never runs past the latest arrival plus all the work
        let latest = processes.iter().map(|p| p.arrival).max().unwrap_or(0);
        if processes
            .iter()
            .try_fold(latest, |acc: Ticks, p| acc.checked_add(p.burst))
            .is_none()
        {
            return Err(SimError::HorizonOverflow);
        }

        report.loaded = processes.len();
        self.processes = processes;
        self.index = index;
        self.descriptors = descriptors;
        self.trace.clear();
        self.now = 0;
        self.observer.reset();

        debug!(
            "Loaded {} processes ({} rejected)",
            report.loaded,
            report.rejected.len()
        );
        Ok(report)
    }

    pub fn reset(&mut self) {
        for (process, spec) in self.processes.iter_mut().zip(&self.descriptors) {
            // Validated on load
            if let Ok(fresh) = Process::from_spec(spec) {
                *process = fresh;
            }
        }
        self.trace.clear();
        self.now = 0;
        self.observer.reset();
    }

    // None when refused; nothing changes then
    pub fn dispatch(&mut self, pid: Pid, duration: Ticks) -> Option<Ticks> {
        let Some(&idx) = self.index.get(&pid) else {
            warn!("Dispatch of unknown process {pid} ignored");
            return None;
        };
        if duration == 0 {
            warn!("Dispatch of process {pid} with zero duration ignored");
            return None;
        }

        let now = self.now;
        let process = &mut self.processes[idx];
        if !process.has_arrived(now) {
            warn!(
                "Dispatch of process {pid} at {now} before its arrival at {} ignored",
                process.arrival
            );
            return None;
        }
        if process.is_complete() {
            warn!("Dispatch of completed process {pid} ignored");
            return None;
        }

        let ran = duration.min(process.remaining);
        let Some(end) = now.checked_add(ran) else {
            warn!("Dispatch of process {pid} at {now} would overflow the clock, ignored");
            return None;
        };

        if process.start_time.is_none() {
            process.start_time = Some(now);
        }
        process.remaining -= ran;

        if process.is_complete() {
            process.completion_time = Some(end);
            process.metrics = process.derive_metrics();
            debug!("Process {pid} completed at {end}");
        }

        self.trace.push(Occupant::Process(pid), now, end);
        self.now = end;
        trace!("t={now} ran P{pid} for {ran} (requested {duration})");

        self.observer
            .observe(self.now, Some(&self.processes[idx]), &self.trace);
        Some(ran)
    }

    pub fn advance_to(&mut self, time: Ticks) {
        if time <= self.now {
            return;
        }

        debug!("CPU idle from {} to {}", self.now, time);
        self.trace.push_idle(self.now, time);
        self.now = time;

        self.observer.observe(self.now, None, &self.trace);
    }

    pub fn ready_at(&self, time: Ticks) -> impl Iterator<Item = &Process> + '_ {
        self.processes
            .iter()
            .filter(move |p| p.has_arrived(time) && !p.is_complete())
    }

    pub fn ready_pids(&self, time: Ticks) -> Vec<Pid> {
        self.ready_at(time).map(|p| p.pid).collect()
    }

    pub fn next_arrival_after(&self, time: Ticks) -> Option<Ticks> {
        self.processes
            .iter()
            .filter(|p| !p.is_complete() && p.arrival > time)
            .map(|p| p.arrival)
            .min()
    }

    pub fn idle_until_next_arrival(&mut self) -> bool {
        match self.next_arrival_after(self.now) {
            Some(arrival) => {
                self.advance_to(arrival);
                true
            }
            None => false,
        }
    }

    pub fn all_complete(&self) -> bool {
        self.processes.iter().all(Process::is_complete)
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<&Process> {
        self.index.get(&pid).map(|&idx| &self.processes[idx])
    }

    pub fn remaining(&self, pid: Pid) -> Option<Ticks> {
        self.find_by_pid(pid).map(|p| p.remaining)
    }

    pub fn arrival_order(&self) -> Vec<Pid> {
        let mut order: Vec<&Process> = self.processes.iter().collect();
        order.sort_by_key(|p| p.arrival_key());
        order.into_iter().map(|p| p.pid).collect()
    }

    pub fn now(&self) -> Ticks {
        self.now
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    pub fn descriptors(&self) -> &[ProcessSpec] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    // Cursor and trace length; unchanged across a step means no progress
    pub(crate) fn progress_marker(&self) -> (Ticks, usize) {
        (self.now, self.trace.len())
    }
}
