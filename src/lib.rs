pub mod config;
pub mod core;
pub mod report;
pub mod sim;

pub use config::{Cli, ConfigError, SimConfig};
pub use report::TraceWriter;
pub use sim::{Job, Label, Sim, Summary};
