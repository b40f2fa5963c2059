//! Isolated execution of test bodies.
//!
//! A worker runs one body so that its crash or fatal assertion cannot take the
//! rest of the run down, then folds the body's counts into the session.
//! Two capabilities exist:
//! - [`ForkWorker`] (unix): a forked child with a shared result block.
//! - [`InlineWorker`]: same process; contains panics only.
//!
//! [`negotiate_worker`] picks one from `MU_ISOLATION` and the platform.

#[cfg(unix)]
mod fork;
mod inline;

#[cfg(unix)]
pub use fork::ForkWorker;
pub use inline::InlineWorker;

use std::fmt;

use crate::config::{self, IsolationMode};
use crate::counters::Tally;
use crate::error::IsolationError;
use crate::events::{EventEntry, EventKind, Outcome};
use crate::session::{Session, exit_immediately};

/// Exit status of the forked worker used when the body panics.
pub const PANIC_EXIT_STATUS: i32 = 101;

/// How an isolated body ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerExit {
    /// The worker published its counts (normal end, fatal assertion, `exit`).
    Reported { status: i32 },
    /// The worker exited without publishing.
    Exited(i32),
    /// The worker was killed by a signal before publishing.
    Signaled(i32),
    /// The body panicked (inline worker).
    Panicked,
}

impl WorkerExit {
    #[must_use]
    pub const fn crashed(self) -> bool {
        !matches!(self, Self::Reported { .. })
    }
}

impl fmt::Display for WorkerExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reported { status } => write!(f, "reported with status {status}"),
            Self::Exited(code) => write!(f, "exited with status {code}"),
            Self::Signaled(sig) => write!(f, "terminated by signal {sig}"),
            Self::Panicked => f.write_str("panicked"),
        }
    }
}

/// What a worker observed for one body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    /// Child pid for forked workers.
    pub pid: Option<i32>,
    /// Counts produced by the body and folded into the session.
    pub tally: Tally,
    pub exit: WorkerExit,
}

/// Capability to run a test body in isolation.
pub trait IsolatedWorker {
    fn mode(&self) -> IsolationMode;

    /// Run `body` and fold its counts into `session`.
    fn run(
        &self,
        session: &Session,
        body: &mut dyn FnMut(),
    ) -> Result<WorkerReport, IsolationError>;
}

/// Worker for an explicit mode; `Auto` resolves against the platform.
#[must_use]
pub fn worker_for(mode: IsolationMode) -> Box<dyn IsolatedWorker> {
    match mode.resolve() {
        #[cfg(unix)]
        IsolationMode::Fork => Box::new(ForkWorker),
        _ => Box::new(InlineWorker),
    }
}

/// Worker selected by `MU_ISOLATION`.
#[must_use]
pub fn negotiate_worker() -> Box<dyn IsolatedWorker> {
    worker_for(config::isolation_mode())
}

impl Session {
    /// Run `body` with `worker`; a body that ended without reporting is
    /// announced and counted as one failed assertion.
    pub fn run_isolated_with(
        &self,
        worker: &dyn IsolatedWorker,
        body: &mut dyn FnMut(),
    ) -> Result<WorkerReport, IsolationError> {
        let report = worker.run(self, body)?;
        if report.exit.crashed() {
            let label = report
                .pid
                .map_or_else(|| "inline".to_string(), |pid| pid.to_string());
            self.write_line(&format!(
                "{:>8}: isolated worker {label} {} before reporting\n",
                self.name(),
                report.exit
            ));
            self.counters().record(false);
        }
        Ok(report)
    }

    /// Run `body` with the negotiated worker. Infrastructure failures end the
    /// process with the failure status.
    pub fn run_isolated(&self, body: impl FnOnce()) -> WorkerReport {
        let mut body = Some(body);
        let mut call = move || {
            if let Some(body) = body.take() {
                body();
            }
        };
        let worker = negotiate_worker();
        match self.run_isolated_with(worker.as_ref(), &mut call) {
            Ok(report) => report,
            Err(err) => {
                self.write_line(&format!("{:>8}: {err}\n", self.name()));
                exit_immediately(libc::EXIT_FAILURE)
            }
        }
    }

    pub(crate) fn emit_worker_exit(&self, report: &WorkerReport) {
        let mut entry = EventEntry::new(self.name(), EventKind::WorkerExit)
            .with_tally(report.tally)
            .with_outcome(if report.exit.crashed() {
                Outcome::Crash
            } else if report.tally.passed() {
                Outcome::Pass
            } else {
                Outcome::Fail
            });
        if let Some(pid) = report.pid {
            entry = entry.with_worker(pid);
        }
        entry = match report.exit {
            WorkerExit::Reported { status } | WorkerExit::Exited(status) => {
                entry.with_exit_code(status)
            }
            WorkerExit::Signaled(sig) => entry.with_signal(sig),
            WorkerExit::Panicked => entry,
        };
        self.emit(entry);
    }
}
