//! The deterministic log-emission loop

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::cli::AttachMode;
use crate::marker::{self, MarkerError};
use crate::sink::{AttachError, LogSink};

/// Channel name the fixture emits under
pub const SINK_NAME: &str = "logloop";

/// Run parameters, created once from process inputs and immutable for the
/// run's lifetime
#[derive(Debug, Clone)]
pub struct FixtureConfig {
    /// Requested iteration count; zero or negative still runs one iteration
    pub iterations: i64,
    /// Marker created after the first iteration's records are emitted
    pub first_hit_marker: Option<PathBuf>,
    /// Marker awaited before the last iteration's records are emitted
    pub wait_before_last_marker: Option<PathBuf>,
    /// Recheck interval while waiting on a marker
    pub poll_interval: Duration,
}

/// Fatal fixture failures
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error(transparent)]
    Attach(#[from] AttachError),
    #[error(transparent)]
    Marker(#[from] MarkerError),
}

/// Run the fixture: attach the sink, emit the record sequence, release the
/// handler (flushing the backend) on every exit path.
///
/// Per iteration, in this order: block on the wait-before-last marker when
/// this is the final index, emit the INFO/WARN/ERROR triple, then create the
/// first-hit marker when this is index 0. Index 0 always executes, even for
/// zero or negative iteration counts.
pub fn run(config: &FixtureConfig, sink: LogSink, mode: AttachMode) -> Result<(), FixtureError> {
    let _attached = sink.attach(mode)?;

    let mut index: i64 = 0;
    loop {
        // Never true for counts <= 0: their single iteration is not gated.
        if index + 1 == config.iterations {
            if let Some(path) = &config.wait_before_last_marker {
                marker::wait_for(path, config.poll_interval);
            }
        }

        tracing::info!(target: SINK_NAME, "logging the world");
        tracing::warn!(target: SINK_NAME, "some warning");
        tracing::error!(target: SINK_NAME, "error!");

        if index == 0 {
            if let Some(path) = &config.first_hit_marker {
                marker::touch(path)?;
            }
        }

        index += 1;
        if index >= config.iterations {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Severity;
    use crate::sink::MemoryBackend;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;
    use tracing::Level;

    fn config(iterations: i64) -> FixtureConfig {
        FixtureConfig {
            iterations,
            first_hit_marker: None,
            wait_before_last_marker: None,
            poll_interval: Duration::from_millis(1),
        }
    }

    fn run_captured(config: &FixtureConfig) -> Arc<MemoryBackend> {
        let backend = MemoryBackend::new();
        let sink = LogSink::new(SINK_NAME, Level::INFO, backend.clone());
        run(config, sink, AttachMode::Scoped).unwrap();
        backend
    }

    #[test]
    fn test_three_iterations_emit_nine_records() {
        let backend = run_captured(&config(3));
        assert_eq!(backend.records().len(), 9);
    }

    #[test]
    fn test_records_are_ordered_info_warn_error() {
        let backend = run_captured(&config(2));
        let records = backend.records();
        for triple in records.chunks(3) {
            assert_eq!(triple[0].level, Severity::Info);
            assert_eq!(triple[0].message, "logging the world");
            assert_eq!(triple[1].level, Severity::Warn);
            assert_eq!(triple[1].message, "some warning");
            assert_eq!(triple[2].level, Severity::Error);
            assert_eq!(triple[2].message, "error!");
        }
    }

    #[test]
    fn test_zero_iterations_still_runs_once() {
        let backend = run_captured(&config(0));
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_negative_iterations_still_runs_once() {
        let backend = run_captured(&config(-7));
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_first_hit_marker_created() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("first");
        let mut cfg = config(1);
        cfg.first_hit_marker = Some(path.clone());

        let backend = run_captured(&cfg);

        assert!(path.exists());
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_first_hit_marker_existing_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("first");
        fs::write(&path, b"").unwrap();
        let mut cfg = config(2);
        cfg.first_hit_marker = Some(path.clone());

        run_captured(&cfg);
        assert!(path.exists());
    }

    #[test]
    fn test_first_hit_marker_failure_is_fatal_after_first_triple() {
        let tmp = TempDir::new().unwrap();
        let mut cfg = config(3);
        cfg.first_hit_marker = Some(tmp.path().join("missing_dir").join("first"));

        let backend = MemoryBackend::new();
        let sink = LogSink::new(SINK_NAME, Level::INFO, backend.clone());
        let err = run(&cfg, sink, AttachMode::Scoped).unwrap_err();

        assert!(matches!(err, FixtureError::Marker(_)));
        // The first triple was already forwarded before the failure
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_wait_before_last_gates_final_iteration() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("wait");
        let mut cfg = config(2);
        cfg.wait_before_last_marker = Some(path.clone());

        let creator = {
            let path = path.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                fs::write(&path, b"").unwrap();
            })
        };

        let backend = run_captured(&cfg);
        creator.join().unwrap();

        // Both iterations ran to completion once the marker appeared
        assert_eq!(backend.records().len(), 6);
    }

    #[test]
    fn test_wait_marker_not_required_for_non_positive_counts() {
        // iterations <= 0: the single iteration is not the "last index",
        // so an absent wait marker must not block the run.
        let tmp = TempDir::new().unwrap();
        let mut cfg = config(0);
        cfg.wait_before_last_marker = Some(tmp.path().join("never_created"));

        let backend = run_captured(&cfg);
        assert_eq!(backend.records().len(), 3);
    }

    #[test]
    fn test_single_iteration_waits_then_touches() {
        let tmp = TempDir::new().unwrap();
        let wait = tmp.path().join("wait");
        let first = tmp.path().join("first");
        fs::write(&wait, b"").unwrap();

        let mut cfg = config(1);
        cfg.first_hit_marker = Some(first.clone());
        cfg.wait_before_last_marker = Some(wait);

        let backend = run_captured(&cfg);

        assert_eq!(backend.records().len(), 3);
        assert!(first.exists());
    }
}
