//! Logloop - deterministic log-emission fixture for tracing-agent integration tests
//!
//! This library backs the `logloop` binary: a trivial fixture that emits a fixed
//! sequence of log records per iteration and synchronizes with an external test
//! harness through marker files. Harnesses can also drive the fixture in-process
//! and capture the forwarded records with [`sink::MemoryBackend`].

pub mod cli;
pub mod fixture;
pub mod marker;
pub mod record;
pub mod sink;
