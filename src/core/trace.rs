use std::fmt;

use log::error;
use serde::Serialize;

use super::{
    error::TraceError,
    state::{Pid, Ticks},
};

// Spans longer than this are drawn at this width
const GANTT_SPAN_CAP: Ticks = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Occupant {
    Idle,
    Process(Pid),
}

impl Occupant {
    pub fn pid(self) -> Option<Pid> {
        match self {
            Self::Idle => None,
            Self::Process(pid) => Some(pid),
        }
    }

    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

impl fmt::Display for Occupant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::Process(pid) => write!(f, "P{pid}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub occupant: Occupant,
    pub start: Ticks,
    pub end: Ticks,
}

impl TraceEntry {
    pub fn new(occupant: Occupant, start: Ticks, end: Ticks) -> Self {
        Self {
            occupant,
            start,
            end,
        }
    }

    pub fn duration(&self) -> Ticks {
        self.end - self.start
    }

    pub fn is_idle(&self) -> bool {
        self.occupant.is_idle()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Trace {
    entries: Vec<TraceEntry>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, occupant: Occupant, start: Ticks, end: Ticks) -> bool {
        if start >= end {
            error!("Refusing empty trace span {occupant} [{start}, {end})");
            return false;
        }
        self.entries.push(TraceEntry::new(occupant, start, end));
        true
    }

    pub fn push_idle(&mut self, start: Ticks, end: Ticks) -> bool {
        self.push(Occupant::Idle, start, end)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEntry> {
        self.entries.iter()
    }

    pub fn total_time(&self) -> Ticks {
        self.entries.last().map_or(0, |e| e.end)
    }

    pub fn idle_time(&self) -> Ticks {
        self.entries
            .iter()
            .filter(|e| e.is_idle())
            .fold(0, |acc: Ticks, e| acc.saturating_add(e.duration()))
    }

    pub fn busy_time(&self) -> Ticks {
        self.total_time().saturating_sub(self.idle_time())
    }

    pub fn utilization(&self) -> f64 {
        let total = self.total_time();
        if total == 0 {
            return 0.0;
        }
        self.busy_time() as f64 / total as f64 * 100.0
    }

    pub fn service_of(&self, pid: Pid) -> Ticks {
        self.entries
            .iter()
            .filter(|e| e.occupant == Occupant::Process(pid))
            .fold(0, |acc: Ticks, e| acc.saturating_add(e.duration()))
    }

    pub fn validate(&self) -> Result<(), TraceError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.start >= entry.end {
                return Err(TraceError::EmptySpan { index });
            }
        }
        for (index, pair) in self.entries.windows(2).enumerate() {
            if pair[0].end != pair[1].start {
                return Err(TraceError::Discontinuity {
                    index: index + 1,
                    expected: pair[0].end,
                    found: pair[1].start,
                });
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    // Two columns per tick
    pub fn gantt_chart(&self) -> String {
        if self.entries.is_empty() {
            return "Empty Gantt Chart\n".to_string();
        }

        let mut bar = String::from("|");
        let mut axis = self.entries[0].start.to_string();
        for entry in &self.entries {
            let width = (entry.duration().min(GANTT_SPAN_CAP) * 2) as usize;
            bar.push_str(&format!("{:>width$}|", entry.occupant.to_string()));

            let label = entry.end.to_string();
            let dashes = width.saturating_sub(label.len()).max(1);
            axis.push_str(&"-".repeat(dashes));
            axis.push_str(&label);
        }

        format!("{bar}\n{axis}\n")
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEntry;
    type IntoIter = std::slice::Iter<'a, TraceEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// Detailed table: one line per span
impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return writeln!(f, "Empty Gantt Chart");
        }
        writeln!(f, "{:<12}{:<10}{}", "Time", "Process", "Duration")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<12}{:<10}{}",
                format!("{}-{}", entry.start, entry.end),
                entry.occupant.to_string(),
                entry.duration()
            )?;
        }
        Ok(())
    }
}
