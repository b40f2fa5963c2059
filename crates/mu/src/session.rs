//! Test sessions: counters, run name, output sink and isolation binding.
//!
//! The process-wide session behind the assertion macros is
//! [`Session::global`]. Its first [`Session::begin`] installs an at-exit hook
//! that finalizes a still-open run when the process exits normally.

use std::io::{self, Write};
use std::ptr;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, AtomicPtr, Ordering};

use parking_lot::{Mutex, const_mutex};

use crate::config::{self, ReportConfig};
use crate::counters::{RunCounters, Tally};
use crate::events::{EventEntry, EventKind, EventLog, Outcome};
use crate::report::{self, RunStatus};
use crate::shared::ResultBlock;

/// Where failure and summary lines go.
#[derive(Debug)]
pub enum Sink {
    Stderr,
    Buffer(Vec<u8>),
}

/// One counter pair plus everything needed to report on it.
#[derive(Debug)]
pub struct Session {
    counters: RunCounters,
    name: Mutex<String>,
    sink: Mutex<Sink>,
    events: Mutex<Option<EventLog>>,
    report: ReportConfig,
    open: AtomicBool,
    child_block: AtomicPtr<ResultBlock>,
}

static GLOBAL: Session = Session::new();
static AT_EXIT: Once = Once::new();

impl Session {
    /// A session reporting to stderr with the feature-selected report config.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counters: RunCounters::new(),
            name: const_mutex(String::new()),
            sink: const_mutex(Sink::Stderr),
            events: const_mutex(None),
            report: ReportConfig::from_features(),
            open: AtomicBool::new(false),
            child_block: AtomicPtr::new(ptr::null_mut()),
        }
    }

    /// A session whose output is kept in memory; see [`Session::take_output`].
    #[must_use]
    pub fn buffered() -> Self {
        Self {
            sink: const_mutex(Sink::Buffer(Vec::new())),
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_report(mut self, report: ReportConfig) -> Self {
        self.report = report;
        self
    }

    #[must_use]
    pub fn with_event_log(self, log: EventLog) -> Self {
        *self.events.lock() = Some(log);
        self
    }

    /// The process-wide session used by the assertion macros.
    #[must_use]
    pub fn global() -> &'static Session {
        &GLOBAL
    }

    fn is_global(&self) -> bool {
        ptr::eq(self, &GLOBAL)
    }

    /// Start a named run: counters are zeroed and the name replaced.
    pub fn begin(&self, name: &str) {
        if self.is_global() {
            register_at_exit();
            self.open_env_event_log();
        }
        self.counters.store(Tally::ZERO);
        *self.name.lock() = name.to_string();
        self.open.store(true, Ordering::SeqCst);
        self.emit(EventEntry::new(name, EventKind::RunBegin));
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.name.lock().clone()
    }

    /// Current counts without resetting them.
    #[must_use]
    pub fn tally(&self) -> Tally {
        self.counters.load()
    }

    #[must_use]
    pub fn counters(&self) -> &RunCounters {
        &self.counters
    }

    /// True between [`Session::begin`] and the finalization of that run.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// True inside a forked worker bound to a shared result block.
    #[must_use]
    pub fn is_isolated_child(&self) -> bool {
        !self.child_block.load(Ordering::SeqCst).is_null()
    }

    /// Report the current run and reset the counters.
    ///
    /// Inside an isolated child this publishes the tally to the shared block
    /// and terminates the process instead of returning.
    pub fn finalize(&self) -> RunStatus {
        if self.is_isolated_child() {
            self.finish_child();
        }
        let tally = self.counters.take();
        self.open.store(false, Ordering::SeqCst);
        let name = self.name();
        let status = RunStatus::from(tally);
        if let Some(line) = report::summary_line(&name, tally, self.report) {
            self.write_line(&line);
        }
        let outcome = if status.is_success() {
            Outcome::Pass
        } else {
            Outcome::Fail
        };
        self.emit(
            EventEntry::new(&name, EventKind::RunSummary)
                .with_tally(tally)
                .with_outcome(outcome)
                .with_exit_code(status.code()),
        );
        let _ = io::stdout().flush();
        status
    }

    /// Finalize, then exit the process with the run's status.
    pub fn terminate(&self) -> ! {
        let status = self.finalize();
        std::process::exit(status.code())
    }

    /// Drain the buffered output. Empty for stderr-backed sessions.
    pub fn take_output(&self) -> String {
        match &mut *self.sink.lock() {
            Sink::Buffer(buf) => String::from_utf8_lossy(&std::mem::take(buf)).into_owned(),
            Sink::Stderr => String::new(),
        }
    }

    /// Drain buffered event log lines. Empty unless a buffer log is attached.
    pub fn take_events(&self) -> String {
        self.events
            .lock()
            .as_mut()
            .map(EventLog::take_buffered)
            .unwrap_or_default()
    }

    /// Write one line to the sink and flush it.
    pub(crate) fn write_line(&self, line: &str) {
        match &mut *self.sink.lock() {
            Sink::Stderr => {
                let mut err = io::stderr().lock();
                let _ = err.write_all(line.as_bytes());
                let _ = err.flush();
            }
            Sink::Buffer(buf) => buf.extend_from_slice(line.as_bytes()),
        }
    }

    /// Append an event; a failing log is dropped after reporting once.
    pub(crate) fn emit(&self, entry: EventEntry) {
        let mut events = self.events.lock();
        let Some(log) = events.as_mut() else {
            return;
        };
        if let Err(err) = log.emit(entry) {
            *events = None;
            drop(events);
            self.write_line(&format!("mu: event log disabled: {err}\n"));
        }
    }

    /// Bind this session to `block` in a freshly forked child.
    pub(crate) fn enter_child(&self, block: *mut ResultBlock) {
        self.counters.store(Tally::ZERO);
        self.child_block.store(block, Ordering::SeqCst);
        self.open.store(true, Ordering::SeqCst);
        if !self.is_global() {
            // Only the session that forked reports for this child.
            GLOBAL.open.store(false, Ordering::SeqCst);
        }
    }

    pub(crate) fn finish_child(&self) -> ! {
        let tally = self.counters.take();
        let block = self.child_block.load(Ordering::SeqCst);
        // SAFETY: `block` was mapped by the parent before fork and stays mapped
        // until the parent has reaped this process.
        unsafe { (*block).publish(tally) };
        let _ = io::stdout().flush();
        exit_immediately(RunStatus::from(tally).code())
    }

    fn open_env_event_log(&self) {
        let mut events = self.events.lock();
        if events.is_some() {
            return;
        }
        let Some(path) = config::event_log_path() else {
            return;
        };
        match EventLog::open(&path) {
            Ok(log) => *events = Some(log),
            Err(err) => {
                drop(events);
                self.write_line(&format!("mu: {err}\n"));
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

fn register_at_exit() {
    AT_EXIT.call_once(|| {
        #[cfg(unix)]
        {
            // SAFETY: registering a plain extern "C" fn with no captured state.
            if unsafe { libc::atexit(finalize_at_exit) } != 0 {
                GLOBAL.write_line("mu: failed to register at-exit finalizer\n");
            }
        }
    });
}

extern "C" fn finalize_at_exit() {
    if !GLOBAL.is_open() && !GLOBAL.is_isolated_child() {
        return;
    }
    let status = GLOBAL.finalize();
    if !status.is_success() {
        exit_immediately(status.code());
    }
}

/// Terminate without running at-exit handlers again.
pub(crate) fn exit_immediately(code: i32) -> ! {
    #[cfg(unix)]
    {
        // SAFETY: `_exit` is async-signal-safe and never returns.
        unsafe { libc::_exit(code) }
    }
    #[cfg(not(unix))]
    {
        std::process::exit(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_resets_counters_and_sets_name() {
        let session = Session::buffered();
        session.counters().record(false);
        session.begin("fresh");
        assert_eq!(session.tally(), Tally::ZERO);
        assert_eq!(session.name(), "fresh");
        assert!(session.is_open());
    }

    #[test]
    fn finalize_reports_and_resets() {
        let session = Session::buffered();
        session.begin("basic");
        session.counters().record(true);
        session.counters().record(false);
        assert_eq!(session.finalize(), RunStatus::Failure);
        assert_eq!(session.take_output(), "   basic: failed 1 of 2 assertions\n");
        assert_eq!(session.tally(), Tally::ZERO);
        assert!(!session.is_open());
    }

    #[test]
    fn repeated_runs_start_from_zero() {
        let session = Session::buffered();
        session.begin("first");
        session.counters().record(false);
        assert_eq!(session.finalize(), RunStatus::Failure);
        session.begin("second");
        session.counters().record(true);
        assert_eq!(session.finalize(), RunStatus::Success);
        let out = session.take_output();
        assert!(out.ends_with("  second: passed 1 assertion\n"), "{out}");
    }

    #[test]
    fn silent_report_prints_nothing_but_keeps_status() {
        let session = Session::buffered().with_report(ReportConfig::silent());
        session.begin("quiet");
        session.counters().record(false);
        assert_eq!(session.finalize(), RunStatus::Failure);
        assert!(session.take_output().is_empty());
    }

    #[test]
    fn events_are_emitted_for_begin_and_summary() {
        let session = Session::buffered().with_event_log(EventLog::to_buffer());
        session.begin("logged");
        session.counters().record(true);
        session.finalize();
        let events = session.take_events();
        let lines: Vec<_> = events.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains(r#""event":"run_begin""#));
        assert!(lines[1].contains(r#""event":"run_summary""#));
        assert!(lines[1].contains(r#""assertions":1"#));
        assert!(lines[1].contains(r#""outcome":"pass""#));
    }

    #[test]
    fn local_sessions_are_not_children() {
        assert!(!Session::buffered().is_isolated_child());
    }
}
