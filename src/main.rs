use std::io::{self, BufWriter};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use mlfq_model::{Cli, Sim, SimConfig, TraceWriter, config::USAGE};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let config = match SimConfig::try_from(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!("Usage: {USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &SimConfig) -> anyhow::Result<()> {
    let mut sim = Sim::from_config(config);
    let mut trace = TraceWriter::new(BufWriter::new(io::stdout().lock()));

    // The event callback cannot fail, so hold on to the first write error
    let mut write_result = Ok(());
    let summary = sim.run(|event| {
        if write_result.is_ok() {
            write_result = trace.event(event);
        }
    });
    write_result.context("writing trace")?;

    trace.summary(&summary).context("writing summary")?;
    trace.finish().context("flushing trace")?;
    Ok(())
}

// Logs go to stderr so stdout carries only the trace
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
