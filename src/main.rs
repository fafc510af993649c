use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use log::{info, warn};
use sched_sim::{
    LoadMode, PolicyKind, Sim, SimConfig,
    core::ProcessSpec,
    metrics::Report,
    sim::{BernoulliWorkload, report, workload},
};

#[derive(Debug, Parser)]
#[command(name = "sched_sim")]
#[command(version)]
#[command(about = "CPU scheduling simulator: FCFS, SJF, STCF/SRTF and Round Robin")]
struct Opts {
    #[command(subcommand)]
    command: Cmd,

    /// JSON config file (quantum, max_ticks, load_mode).
    #[clap(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Round Robin time quantum. Overrides the config file.
    #[clap(short = 'q', long, global = true)]
    quantum: Option<u64>,

    /// Fail a run whose clock passes this tick.
    #[clap(long, global = true)]
    max_ticks: Option<u64>,

    /// Refuse the whole workload on the first invalid process.
    #[clap(long, global = true, action = clap::ArgAction::SetTrue)]
    strict: bool,

    /// Print the results as JSON instead of text.
    #[clap(long, global = true, action = clap::ArgAction::SetTrue)]
    json: bool,

    /// Enable verbose output. Specify multiple times to increase verbosity.
    #[clap(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Run one policy (fcfs|fifo, sjf, stcf|srtf, rr) on a workload file.
    Run {
        policy: String,
        input: PathBuf,

        /// Don't display the Gantt chart.
        #[clap(long, action = clap::ArgAction::SetTrue)]
        no_gantt: bool,

        /// Show detailed performance metrics and the per-span trace.
        #[clap(long, action = clap::ArgAction::SetTrue)]
        detailed: bool,
    },
    /// Run every policy on the same workload and compare.
    Compare { input: PathBuf },
    /// Write the sample workloads into a directory.
    Samples {
        #[clap(default_value = "test_data")]
        dir: PathBuf,
    },
    /// Generate a seeded random workload and compare every policy on it.
    Random {
        #[clap(long, default_value = "100")]
        ticks: u64,
        #[clap(long, default_value = "0.3")]
        p_arrival: f64,
        #[clap(long, default_value = "0.3")]
        p_short: f64,
        #[clap(long, default_value = "0")]
        seed: u64,
    },
}

fn build_config(opts: &Opts) -> Result<SimConfig> {
    let mut config = match &opts.config {
        Some(path) => SimConfig::from_file(path)?,
        None => SimConfig::default(),
    };
    if let Some(quantum) = opts.quantum {
        config.quantum = quantum;
    }
    if opts.max_ticks.is_some() {
        config.max_ticks = opts.max_ticks;
    }
    if opts.strict {
        config.load_mode = LoadMode::Strict;
    }
    Ok(config)
}

fn load(input: &Path, config: &SimConfig) -> Result<Vec<ProcessSpec>> {
    info!("Loading processes from: {}", input.display());
    let specs = workload::load_file(input, config.load_mode)
        .with_context(|| format!("Failed to load workload {}", input.display()))?;
    Ok(specs)
}

fn compare(specs: &[ProcessSpec], config: SimConfig, json: bool) -> Result<()> {
    let kinds = PolicyKind::all(config.quantum);
    let mut sim = Sim::new(specs, config)?;

    let mut results: Vec<(String, Report)> = Vec::with_capacity(kinds.len());
    for outcome in sim.compare(&kinds)? {
        let report = outcome.report()?;
        results.push((outcome.policy, report));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", report::comparison(&results));
    }
    Ok(())
}

fn main() -> Result<()> {
    let opts = Opts::parse();

    let llv = match opts.verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut lcfg = simplelog::ConfigBuilder::new();
    lcfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        llv,
        lcfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;

    let config = build_config(&opts)?;

    match &opts.command {
        Cmd::Run {
            policy,
            input,
            no_gantt,
            detailed,
        } => {
            let kind = PolicyKind::parse(policy, &config).with_context(|| {
                format!(
                    "Supported algorithms: {}",
                    PolicyKind::ALL_NAMES.join(", ")
                )
            })?;
            let specs = load(input, &config)?;
            let mut sim = Sim::new(&specs, config)?;
            let rejected = sim.load_report().rejected.len();
            if rejected > 0 {
                warn!("{rejected} invalid processes were skipped");
            }

            let outcome = sim.run_kind(kind)?;
            let metrics = outcome.metrics();
            if let Err(e) = metrics.validate_records() {
                warn!("Some processes have invalid timing data: {e}");
            }
            let result = metrics.report()?;

            if opts.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render(&outcome, &result, !*no_gantt, *detailed));
            }
        }
        Cmd::Compare { input } => {
            let specs = load(input, &config)?;
            compare(&specs, config, opts.json)?;
        }
        Cmd::Samples { dir } => {
            let written = workload::write_samples(dir)
                .with_context(|| format!("Failed to write samples to {}", dir.display()))?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Cmd::Random {
            ticks,
            p_arrival,
            p_short,
            seed,
        } => {
            if !(0.0..=1.0).contains(p_arrival) || !(0.0..=1.0).contains(p_short) {
                bail!("Probabilities must lie in [0, 1]");
            }
            let specs = BernoulliWorkload {
                ticks: *ticks,
                p_arrival: *p_arrival,
                p_short: *p_short,
                seed: *seed,
                ..BernoulliWorkload::default()
            }
            .generate();
            if specs.is_empty() {
                bail!("Random workload produced no processes");
            }
            info!("Generated {} processes", specs.len());
            compare(&specs, config, opts.json)?;
        }
    }

    Ok(())
}
