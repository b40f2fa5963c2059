//! Error types.

use std::io;

use thiserror::Error;

/// Failures of the isolation infrastructure. Any of these aborts the run.
#[derive(Debug, Error)]
pub enum IsolationError {
    #[error("failed to map shared result block: {0}")]
    SharedMemory(#[source] io::Error),
    #[error("failed to create isolated worker: {0}")]
    Spawn(#[source] io::Error),
    #[error("failed to wait for isolated worker {pid}: {source}")]
    Wait {
        pid: i32,
        #[source]
        source: io::Error,
    },
}

/// Failures of the structured event log.
#[derive(Debug, Error)]
pub enum EventLogError {
    #[error("failed to open event log {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize event: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write event: {0}")]
    Write(#[from] io::Error),
}
