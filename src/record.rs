//! Records forwarded to the tracing backend and their wire representations

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::Level;

/// Severity of an emitted record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<&Level> for Severity {
    fn from(level: &Level) -> Self {
        if *level == Level::ERROR {
            Severity::Error
        } else if *level == Level::WARN {
            Severity::Warn
        } else if *level == Level::INFO {
            Severity::Info
        } else if *level == Level::DEBUG {
            Severity::Debug
        } else {
            Severity::Trace
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Trace => "TRACE",
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        };
        f.write_str(name)
    }
}

/// A single record as the bridge handler forwards it: severity, channel
/// name and message text, nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Record severity
    pub level: Severity,
    /// Name of the channel the record was emitted under
    pub target: String,
    /// Message text
    pub message: String,
}

impl Record {
    /// Render as a single text line: `LEVEL target: message`
    pub fn render_text(&self) -> String {
        format!("{} {}: {}", self.level, self.target, self.message)
    }

    /// Serialize to a single-line JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
