//! Fork-per-body worker.
//!
//! Protocol: map the shared block, fork, let the child run the body against
//! its private (zeroed) counters and publish at finalization, then block in
//! `waitpid` with no timeout, fold whatever the child published, and unmap.

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use super::{IsolatedWorker, PANIC_EXIT_STATUS, WorkerExit, WorkerReport};
use crate::config::IsolationMode;
use crate::counters::Tally;
use crate::error::IsolationError;
use crate::events::{EventEntry, EventKind};
use crate::session::{Session, exit_immediately};
use crate::shared::SharedResultBlock;

#[derive(Debug, Clone, Copy, Default)]
pub struct ForkWorker;

impl IsolatedWorker for ForkWorker {
    fn mode(&self) -> IsolationMode {
        IsolationMode::Fork
    }

    fn run(
        &self,
        session: &Session,
        body: &mut dyn FnMut(),
    ) -> Result<WorkerReport, IsolationError> {
        let shared = SharedResultBlock::map()?;

        // Nothing buffered may be duplicated into the child.
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();

        // SAFETY: the child only runs the body and then `_exit`s; it never
        // returns into the caller's frames.
        let pid = unsafe { libc::fork() };
        if pid < 0 {
            return Err(IsolationError::Spawn(io::Error::last_os_error()));
        }
        if pid == 0 {
            run_child(session, &shared, body);
        }

        session.emit(EventEntry::new(session.name(), EventKind::WorkerSpawned).with_worker(pid));
        let status = wait_for(pid)?;

        let (tally, exit) = match shared.block().read() {
            Some(tally) => (
                tally,
                WorkerExit::Reported {
                    status: exit_code(status),
                },
            ),
            None => (Tally::ZERO, unreported_exit(status)),
        };
        drop(shared);

        session.counters().absorb(tally);
        let report = WorkerReport {
            pid: Some(pid),
            tally,
            exit,
        };
        session.emit_worker_exit(&report);
        Ok(report)
    }
}

fn run_child(session: &Session, shared: &SharedResultBlock, body: &mut dyn FnMut()) -> ! {
    session.enter_child(shared.as_ptr());
    if panic::catch_unwind(AssertUnwindSafe(|| body())).is_err() {
        let _ = io::stdout().flush();
        exit_immediately(PANIC_EXIT_STATUS);
    }
    session.finish_child()
}

/// `waitpid` without timeout, retried on `EINTR`.
fn wait_for(pid: libc::pid_t) -> Result<libc::c_int, IsolationError> {
    let mut status: libc::c_int = 0;
    loop {
        // SAFETY: `pid` is our child and `status` is a valid out-pointer.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return Ok(status);
        }
        let err = io::Error::last_os_error();
        if rc < 0 && err.kind() == io::ErrorKind::Interrupted {
            continue;
        }
        return Err(IsolationError::Wait { pid, source: err });
    }
}

/// Shell-style code: the exit status, or 128 + signal number.
fn exit_code(status: libc::c_int) -> i32 {
    if libc::WIFSIGNALED(status) {
        128 + libc::WTERMSIG(status)
    } else {
        libc::WEXITSTATUS(status)
    }
}

fn unreported_exit(status: libc::c_int) -> WorkerExit {
    if libc::WIFSIGNALED(status) {
        WorkerExit::Signaled(libc::WTERMSIG(status))
    } else {
        WorkerExit::Exited(libc::WEXITSTATUS(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert::{Severity, Site};

    fn pass(session: &Session) {
        session.check(
            true,
            Site::new("f.rs", 1),
            Severity::Continue,
            format_args!("pass"),
        );
    }

    fn fail(session: &Session, severity: Severity) {
        session.check(
            false,
            Site::new("f.rs", 2),
            severity,
            format_args!("fail"),
        );
    }

    #[test]
    fn child_counts_are_folded_into_parent() {
        let session = Session::buffered();
        session.begin("fork");
        pass(&session);
        let report = ForkWorker
            .run(&session, &mut || {
                pass(&session);
                fail(&session, Severity::Continue);
            })
            .unwrap();
        assert_eq!(report.tally, Tally::new(1, 2));
        assert_eq!(report.exit, WorkerExit::Reported { status: 1 });
        assert_eq!(session.tally(), Tally::new(1, 3));
        assert!(!session.is_isolated_child());
    }

    #[test]
    fn child_starts_from_zero_and_parent_state_is_untouched() {
        let session = Session::buffered();
        session.begin("zero");
        for _ in 0..5 {
            fail(&session, Severity::Continue);
        }
        let report = ForkWorker.run(&session, &mut || pass(&session)).unwrap();
        assert_eq!(report.tally, Tally::PASS);
        assert_eq!(report.exit, WorkerExit::Reported { status: 0 });
        assert_eq!(session.tally(), Tally::new(5, 6));
    }

    #[test]
    fn fatal_failure_publishes_before_exit() {
        let session = Session::buffered();
        session.begin("fatal");
        let report = ForkWorker
            .run(&session, &mut || {
                pass(&session);
                fail(&session, Severity::Fatal);
                pass(&session);
            })
            .unwrap();
        assert_eq!(report.tally, Tally::new(1, 2));
        assert_eq!(report.exit, WorkerExit::Reported { status: 1 });
    }

    #[test]
    fn signal_before_publishing_is_reported_as_crash() {
        let session = Session::buffered();
        session.begin("crash");
        let report = ForkWorker
            .run(&session, &mut || {
                pass(&session);
                // SAFETY: terminates only the forked child.
                unsafe { libc::raise(libc::SIGKILL) };
            })
            .unwrap();
        assert_eq!(report.tally, Tally::ZERO);
        assert_eq!(report.exit, WorkerExit::Signaled(libc::SIGKILL));
    }

    #[test]
    fn raw_exit_without_publishing_is_reported() {
        let session = Session::buffered();
        session.begin("exit");
        let report = ForkWorker
            .run(&session, &mut || {
                exit_immediately(7);
            })
            .unwrap();
        assert_eq!(report.exit, WorkerExit::Exited(7));
    }

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(0), 0);
        assert_eq!(exit_code(1 << 8), 1);
        assert_eq!(exit_code(libc::SIGABRT), 128 + libc::SIGABRT);
    }
}
