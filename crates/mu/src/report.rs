//! Summary line and exit status policy.

use crate::config::ReportConfig;
use crate::counters::Tally;

/// Binary result of a finalized run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunStatus {
    Success,
    Failure,
}

impl RunStatus {
    #[must_use]
    pub const fn from_tally(tally: Tally) -> Self {
        if tally.passed() {
            Self::Success
        } else {
            Self::Failure
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }

    /// Process exit code: `EXIT_SUCCESS` or `EXIT_FAILURE`.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Success => libc::EXIT_SUCCESS,
            Self::Failure => libc::EXIT_FAILURE,
        }
    }
}

impl From<Tally> for RunStatus {
    fn from(tally: Tally) -> Self {
        Self::from_tally(tally)
    }
}

impl From<RunStatus> for std::process::ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Success => Self::SUCCESS,
            RunStatus::Failure => Self::FAILURE,
        }
    }
}

/// The summary line for `tally`, newline-terminated, or `None` when the
/// matching line is suppressed by `config`.
#[must_use]
pub fn summary_line(name: &str, tally: Tally, config: ReportConfig) -> Option<String> {
    let n = tally.assertions;
    let s = if n == 1 { "" } else { "s" };
    if tally.passed() {
        config
            .print_pass
            .then(|| format!("{name:>8}: passed {n} assertion{s}\n"))
    } else {
        config.print_fail.then(|| {
            format!(
                "{name:>8}: failed {} of {n} assertion{s}\n",
                tally.failures
            )
        })
    }
}
