pub mod arrivals;
pub mod driver;
pub mod job;
pub mod metrics;

pub use arrivals::ArrivalScheduler;
pub use driver::Sim;
pub use job::{Job, JobId, Label};
pub use metrics::{Completion, MetricsSink, Summary};
