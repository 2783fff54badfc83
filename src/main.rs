use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use logloop::cli::Cli;
use logloop::fixture::{self, FixtureConfig, SINK_NAME};
use logloop::sink::{LogSink, StreamBackend};

fn main() -> Result<()> {
    let args = Cli::parse();

    let config = FixtureConfig {
        iterations: args.iterations,
        first_hit_marker: args.first_hit_marker,
        wait_before_last_marker: args.wait_before_last_marker,
        poll_interval: Duration::from_millis(args.poll_interval_ms),
    };

    let backend = Arc::new(StreamBackend::stdout(args.format));
    let sink = LogSink::new(SINK_NAME, Level::INFO, backend);

    fixture::run(&config, sink, args.attach)?;

    Ok(())
}
