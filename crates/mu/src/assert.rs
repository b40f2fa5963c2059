//! Assertion evaluation.

use std::fmt;

use crate::events::{EventEntry, EventKind};
use crate::session::Session;

/// Source location of an assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Site {
    pub file: &'static str,
    pub line: u32,
}

impl Site {
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// What a failed assertion does to the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    /// Record, report and continue.
    #[default]
    Continue,
    /// Record, report, finalize and terminate the process.
    Fatal,
}

impl Session {
    /// Count one assertion; on failure print `<file>:<line>: <message>`.
    ///
    /// Returns `passed`. With [`Severity::Fatal`] a failure finalizes the run
    /// and exits the process (the worker process when isolated), so no
    /// destructors or cleanup in the caller run.
    pub fn check(
        &self,
        passed: bool,
        site: Site,
        severity: Severity,
        message: fmt::Arguments<'_>,
    ) -> bool {
        self.counters().record(passed);
        if passed {
            return true;
        }
        let message = message.to_string();
        self.write_line(&format!("{site}: {message}\n"));
        self.emit(
            EventEntry::new(self.name(), EventKind::AssertionFailed)
                .with_location(site.file, site.line)
                .with_message(message),
        );
        if severity == Severity::Fatal {
            self.terminate();
        }
        false
    }
}
