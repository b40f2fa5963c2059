//! Same-process fallback worker.
//!
//! The body runs directly against the session's counters, so there is nothing
//! to fold afterwards. Panics are caught; fatal assertions, aborts and memory
//! corruption still end the whole process.

use std::panic::{self, AssertUnwindSafe};

use super::{IsolatedWorker, WorkerExit, WorkerReport};
use crate::config::IsolationMode;
use crate::counters::Tally;
use crate::error::IsolationError;
use crate::report::RunStatus;
use crate::session::Session;

#[derive(Debug, Clone, Copy, Default)]
pub struct InlineWorker;

impl IsolatedWorker for InlineWorker {
    fn mode(&self) -> IsolationMode {
        IsolationMode::Inline
    }

    fn run(
        &self,
        session: &Session,
        body: &mut dyn FnMut(),
    ) -> Result<WorkerReport, IsolationError> {
        let before = session.tally();
        let result = panic::catch_unwind(AssertUnwindSafe(|| body()));
        let after = session.tally();
        // Assumes no other thread counts into this session meanwhile.
        let tally = Tally::new(
            after.failures.saturating_sub(before.failures),
            after.assertions.saturating_sub(before.assertions),
        );
        let exit = match result {
            Ok(()) => WorkerExit::Reported {
                status: RunStatus::from(tally).code(),
            },
            Err(_) => WorkerExit::Panicked,
        };
        let report = WorkerReport {
            pid: None,
            tally,
            exit,
        };
        session.emit_worker_exit(&report);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{Severity, Site};

    #[test]
    fn counts_land_in_session_once() {
        let session = Session::buffered();
        session.begin("inline");
        session.counters().record(true);
        let report = InlineWorker
            .run(&session, &mut || {
                session.check(
                    false,
                    Site::new("i.rs", 1),
                    Severity::Continue,
                    format_args!("x"),
                );
                session.check(
                    true,
                    Site::new("i.rs", 2),
                    Severity::Continue,
                    format_args!("y"),
                );
            })
            .unwrap();
        assert_eq!(report.tally, Tally::new(1, 2));
        assert_eq!(report.exit, WorkerExit::Reported { status: 1 });
        assert_eq!(session.tally(), Tally::new(1, 3));
    }
}
