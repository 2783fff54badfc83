//! CLI argument parsing for the fixture binary

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Wire format for records written to the backend stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordFormat {
    /// One `LEVEL target: message` line per record (default)
    Text,
    /// One JSON object per record for machine parsing
    Json,
}

/// How the bridge handler is bound to the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AttachMode {
    /// Handler attached for the duration of the run and released afterwards
    Scoped,
    /// Handler installed process-wide, the way an in-process agent would
    Global,
}

#[derive(Parser, Debug)]
#[command(name = "logloop")]
#[command(version)]
#[command(
    about = "Deterministic log-emission fixture for tracing integration tests",
    long_about = None
)]
pub struct Cli {
    /// Number of loop iterations; zero or negative still runs a single iteration
    #[arg(value_name = "ITERATIONS", allow_negative_numbers = true)]
    pub iterations: i64,

    /// Marker file created once the first iteration's records are out
    #[arg(value_name = "FIRST_HIT_MARKER")]
    pub first_hit_marker: Option<PathBuf>,

    /// Marker file awaited before the last iteration's records are emitted
    #[arg(value_name = "WAIT_BEFORE_LAST_MARKER")]
    pub wait_before_last_marker: Option<PathBuf>,

    /// Record output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: RecordFormat,

    /// Backend attachment mode
    #[arg(long = "attach", value_enum, default_value = "scoped")]
    pub attach: AttachMode,

    /// Poll interval in milliseconds while waiting on a marker file
    #[arg(long = "poll-interval-ms", value_name = "MS", default_value = "1")]
    pub poll_interval_ms: u64,
}
