pub mod driver;
pub mod report;
pub mod workload;

pub use driver::{RunOutcome, Sim};
pub use workload::{BernoulliWorkload, WorkloadError};
