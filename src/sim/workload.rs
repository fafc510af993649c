use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::prelude::*;
use thiserror::Error;

use crate::{config::LoadMode, core::ProcessSpec};

#[derive(Error, Debug)]
pub enum WorkloadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("invalid JSON workload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no valid processes found")]
    Empty,
}

// PID ARRIVAL BURST [PRIORITY] [NAME], one per line; `#` starts a comment
pub fn parse_str(data: &str, mode: LoadMode) -> Result<Vec<ProcessSpec>, WorkloadError> {
    let mut specs = Vec::new();

    for (idx, line) in data.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match parse_line(trimmed) {
            Ok(spec) => specs.push(spec),
            Err(reason) if mode == LoadMode::Strict => {
                return Err(WorkloadError::Parse {
                    line: line_no,
                    reason,
                });
            }
            Err(reason) => warn!("Skipping line {line_no} ({trimmed:?}): {reason}"),
        }
    }

    Ok(specs)
}

fn parse_line(line: &str) -> Result<ProcessSpec, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(
            "insufficient data - need at least PID, arrival time, and burst time".to_string(),
        );
    }

    let number = |field: &str, what: &str| -> Result<i64, String> {
        field
            .parse::<i64>()
            .map_err(|e| format!("invalid {what} {field:?}: {e}"))
    };

    let mut spec = ProcessSpec::new(
        number(fields[0], "PID")?,
        number(fields[1], "arrival time")?,
        number(fields[2], "burst time")?,
    );
    if let Some(priority) = fields.get(3) {
        spec.priority = priority
            .parse()
            .map_err(|e| format!("invalid priority {priority:?}: {e}"))?;
    }
    if let Some(name) = fields.get(4) {
        spec.name = Some(name.to_string());
    }

    spec.validate().map_err(|e| e.to_string())?;
    Ok(spec)
}

pub fn load_file(path: impl AsRef<Path>, mode: LoadMode) -> Result<Vec<ProcessSpec>, WorkloadError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| WorkloadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let specs = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str::<Vec<ProcessSpec>>(&data)?
    } else {
        parse_str(&data, mode)?
    };

    if specs.is_empty() {
        return Err(WorkloadError::Empty);
    }
    info!("Loaded {} processes from {}", specs.len(), path.display());
    Ok(specs)
}

pub const SAMPLES: [(&str, &str); 4] = [
    (
        "simple.txt",
        "# Simple test case for FCFS\n\
         # Format: PID Arrival_Time Burst_Time [Priority] [Name]\n\
         1 0 5\n\
         2 1 3\n\
         3 2 8\n\
         4 3 6\n",
    ),
    (
        "interactive.txt",
        "# Interactive workload - good for Round Robin\n\
         1 0 4 0 WebBrowser\n\
         2 1 2 0 TextEditor\n\
         3 2 6 0 Compiler\n\
         4 3 3 0 Calculator\n\
         5 4 1 0 NotePad\n",
    ),
    (
        "priority.txt",
        "# Priority-based test case\n\
         # Lower priority number = higher priority\n\
         1 0 10 3 LowPriorityTask\n\
         2 1 4 1 HighPriorityTask\n\
         3 2 6 2 MediumPriorityTask\n\
         4 3 2 1 AnotherHighPriority\n",
    ),
    (
        "mixed.txt",
        "# Mixed workload for comprehensive testing\n\
         1 0 7 2\n\
         2 2 4 1\n\
         3 4 1 3\n\
         4 5 3 1\n\
         5 8 2 2\n",
    ),
];

pub fn write_samples(dir: impl AsRef<Path>) -> io::Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(SAMPLES.len());
    for (file, contents) in SAMPLES {
        let path = dir.join(file);
        fs::write(&path, contents)?;
        written.push(path);
    }
    info!("Sample data files generated in {}", dir.display());
    Ok(written)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BernoulliWorkload {
    pub ticks: u64,
    pub p_arrival: f64,
    pub p_short: f64,
    pub short_ticks: u64,
    pub long_ticks: u64,
    pub seed: u64,
}

impl Default for BernoulliWorkload {
    fn default() -> Self {
        Self {
            ticks: 100,
            p_arrival: 0.3,
            p_short: 0.3,
            short_ticks: 2,
            long_ticks: 6,
            seed: 0,
        }
    }
}

impl BernoulliWorkload {
    pub fn generate(&self) -> Vec<ProcessSpec> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut specs = Vec::new();

        for t in 0..self.ticks {
            if rng.random::<f64>() < self.p_arrival {
                let burst = if rng.random::<f64>() < self.p_short {
                    self.short_ticks
                } else {
                    self.long_ticks
                };

                specs.push(ProcessSpec::new(specs.len() as i64 + 1, t as i64, burst as i64));
            }
        }

        specs
    }
}
