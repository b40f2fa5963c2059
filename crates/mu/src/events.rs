//! Structured run events.
//!
//! Provides:
//! - [`EventEntry`]: one JSONL record with required + optional fields.
//! - [`EventLog`]: appends entries to a file or an in-memory buffer.
//! - [`validate_event_line`]: checks a single JSONL line against the schema.
//!
//! Every entry is written and flushed as one `write` so a forked worker never
//! inherits half-written or buffered bytes from its parent.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::counters::Tally;
use crate::error::EventLogError;

/// Kind of run event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    RunBegin,
    AssertionFailed,
    WorkerSpawned,
    WorkerExit,
    RunSummary,
}

/// Result attached to summary and worker events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    Crash,
}

/// Canonical event record.
///
/// Required fields: `timestamp`, `seq`, `pid`, `session`, `event`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub timestamp: String,
    pub seq: u64,
    pub pid: u32,
    pub session: String,
    pub event: EventKind,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub failures: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_pid: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signal: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl EventEntry {
    /// Create an entry with required fields only. `seq` is assigned on emit.
    #[must_use]
    pub fn new(session: impl Into<String>, event: EventKind) -> Self {
        Self {
            timestamp: now_utc(),
            seq: 0,
            pid: std::process::id(),
            session: session.into(),
            event,
            failures: None,
            assertions: None,
            file: None,
            line: None,
            message: None,
            worker_pid: None,
            exit_code: None,
            signal: None,
            outcome: None,
        }
    }

    #[must_use]
    pub fn with_tally(mut self, tally: Tally) -> Self {
        self.failures = Some(tally.failures);
        self.assertions = Some(tally.assertions);
        self
    }

    /// Set the source location of an assertion.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_worker(mut self, pid: i32) -> Self {
        self.worker_pid = Some(pid);
        self
    }

    #[must_use]
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    #[must_use]
    pub fn with_signal(mut self, signal: i32) -> Self {
        self.signal = Some(signal);
        self
    }

    #[must_use]
    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Serialize to a single JSONL line (no trailing newline).
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

enum Target {
    File(File),
    Buffer(Vec<u8>),
}

/// Appends JSONL event entries to a file or buffer.
pub struct EventLog {
    target: Target,
    seq: u64,
}

impl EventLog {
    /// Open `path` for appending, creating it if needed.
    pub fn open(path: &Path) -> Result<Self, EventLogError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| EventLogError::Open {
                path: path.display().to_string(),
                source,
            })?;
        Ok(Self {
            target: Target::File(file),
            seq: 0,
        })
    }

    /// An in-memory log (for tests).
    #[must_use]
    pub fn to_buffer() -> Self {
        Self {
            target: Target::Buffer(Vec::new()),
            seq: 0,
        }
    }

    /// Assign the next sequence number to `entry` and write it.
    pub fn emit(&mut self, mut entry: EventEntry) -> Result<(), EventLogError> {
        self.seq += 1;
        entry.seq = self.seq;
        let mut line = entry.to_jsonl()?;
        line.push('\n');
        match &mut self.target {
            Target::File(file) => {
                file.write_all(line.as_bytes())?;
                file.flush()?;
            }
            Target::Buffer(buf) => buf.extend_from_slice(line.as_bytes()),
        }
        Ok(())
    }

    /// Drain buffered lines. Always empty for file-backed logs.
    pub fn take_buffered(&mut self) -> String {
        match &mut self.target {
            Target::Buffer(buf) => String::from_utf8_lossy(&std::mem::take(buf)).into_owned(),
            Target::File(_) => String::new(),
        }
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let target = match self.target {
            Target::File(_) => "file",
            Target::Buffer(_) => "buffer",
        };
        f.debug_struct("EventLog")
            .field("target", &target)
            .field("seq", &self.seq)
            .finish()
    }
}

/// Validation error for an event line.
#[derive(Debug)]
pub struct EventValidationError {
    pub line_number: usize,
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for EventValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: field '{}': {}",
            self.line_number, self.field, self.message
        )
    }
}

/// Validate a single JSONL line against the event schema.
pub fn validate_event_line(
    line: &str,
    line_number: usize,
) -> Result<EventEntry, Vec<EventValidationError>> {
    let error = |field: &str, message: String| EventValidationError {
        line_number,
        field: field.to_string(),
        message,
    };

    let value: serde_json::Value = serde_json::from_str(line)
        .map_err(|e| vec![error("<json>", format!("invalid JSON: {e}"))])?;
    let Some(obj) = value.as_object() else {
        return Err(vec![error("<root>", "expected JSON object".to_string())]);
    };

    let mut errors: Vec<_> = ["timestamp", "seq", "pid", "session", "event"]
        .into_iter()
        .filter(|field| !obj.contains_key(*field))
        .map(|field| error(field, "required field missing".to_string()))
        .collect();

    if let (Some(failures), Some(assertions)) = (
        obj.get("failures").and_then(serde_json::Value::as_u64),
        obj.get("assertions").and_then(serde_json::Value::as_u64),
    ) {
        if failures > assertions {
            errors.push(error(
                "failures",
                format!("failures ({failures}) exceed assertions ({assertions})"),
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    serde_json::from_value(value).map_err(|e| vec![error("<schema>", e.to_string())])
}

/// RFC 3339 UTC timestamp with millisecond precision.
fn now_utc() -> String {
    let duration = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default();
    let secs = duration.as_secs();
    let (year, month, day) = civil_from_days((secs / 86_400) as i64);
    format!(
        "{year:04}-{month:02}-{day:02}T{:02}:{:02}:{:02}.{:03}Z",
        (secs % 86_400) / 3600,
        (secs % 3600) / 60,
        secs % 60,
        duration.subsec_millis(),
    )
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
