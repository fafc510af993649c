use log::info;

use crate::{
    config::SimConfig,
    core::{Engine, LoadReport, Process, ProcessSpec, SimResult, Trace},
    metrics::{Metrics, Report},
    scheduler::{Policy, PolicyKind, create_policy},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub policy: String,
    pub preemptive: bool,
    pub processes: Vec<Process>,
    pub trace: Trace,
}

impl RunOutcome {
    pub fn metrics(&self) -> Metrics<'_> {
        Metrics::new(&self.processes, &self.trace)
    }

    pub fn report(&self) -> SimResult<Report> {
        self.metrics().report()
    }
}

pub struct Sim {
    engine: Engine,
    config: SimConfig,
    load_report: LoadReport,
}

impl Sim {
    pub fn new(specs: &[ProcessSpec], config: SimConfig) -> SimResult<Self> {
        let mut engine = Engine::new().with_max_ticks(config.max_ticks);
        let load_report = engine.load(specs, config.load_mode)?;
        info!(
            "Loaded {} processes ({} rejected)",
            load_report.loaded,
            load_report.rejected.len()
        );

        Ok(Self {
            engine,
            config,
            load_report,
        })
    }

    pub fn run<P: Policy + ?Sized>(&mut self, policy: &mut P) -> SimResult<RunOutcome> {
        self.engine.reset();
        policy.schedule(&mut self.engine)?;
        self.engine.trace().validate()?;

        Ok(RunOutcome {
            policy: policy.name().to_string(),
            preemptive: policy.preemptive(),
            processes: self.engine.processes().to_vec(),
            trace: self.engine.trace().clone(),
        })
    }

    pub fn run_named(&mut self, name: &str) -> SimResult<RunOutcome> {
        let mut policy = create_policy(name, &self.config)?;
        self.run(policy.as_mut())
    }

    pub fn run_kind(&mut self, kind: PolicyKind) -> SimResult<RunOutcome> {
        let mut policy = kind.build()?;
        self.run(policy.as_mut())
    }

    pub fn compare(&mut self, kinds: &[PolicyKind]) -> SimResult<Vec<RunOutcome>> {
        kinds.iter().map(|&kind| self.run_kind(kind)).collect()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }
}
