//! Runtime configuration.
//!
//! Compile-time switches come from cargo features:
//! - `quiet-pass`: suppress the `passed N assertions` summary line.
//! - `quiet-fail`: suppress the `failed F of N assertions` summary line.
//!
//! Environment variables:
//! - `MU_ISOLATION`: `fork`, `inline` or `auto` (default). Selects the isolated
//!   worker implementation. Resolved once and cached for the process.
//! - `MU_EVENT_LOG`: path of a JSONL file receiving structured run events from
//!   the process-wide session.

use std::path::PathBuf;
use std::sync::OnceLock;

pub const ISOLATION_ENV: &str = "MU_ISOLATION";
pub const EVENT_LOG_ENV: &str = "MU_EVENT_LOG";

/// Which summary lines the finalizer prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportConfig {
    pub print_pass: bool,
    pub print_fail: bool,
}

impl ReportConfig {
    /// Configuration selected by the `quiet-pass` / `quiet-fail` features.
    #[must_use]
    pub const fn from_features() -> Self {
        Self {
            print_pass: !cfg!(feature = "quiet-pass"),
            print_fail: !cfg!(feature = "quiet-fail"),
        }
    }

    /// Print nothing; only the exit status carries the result.
    #[must_use]
    pub const fn silent() -> Self {
        Self {
            print_pass: false,
            print_fail: false,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::from_features()
    }
}

/// Requested isolation capability.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationMode {
    /// Fork where the platform supports it, otherwise run inline.
    #[default]
    Auto,
    /// Always fork a child process per test body.
    Fork,
    /// Run test bodies in the calling process.
    Inline,
}

impl IsolationMode {
    /// Parse from string (case-insensitive). Unknown values map to `Auto`.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "fork" | "process" | "subprocess" => Self::Fork,
            "inline" | "none" | "off" | "same-process" => Self::Inline,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against the host platform.
    #[must_use]
    pub const fn resolve(self) -> Self {
        match self {
            Self::Auto if cfg!(unix) => Self::Fork,
            Self::Auto => Self::Inline,
            other => other,
        }
    }
}

static MODE: OnceLock<IsolationMode> = OnceLock::new();

/// Isolation mode from `MU_ISOLATION`, read on first call and cached.
///
/// Every caller, including ones racing with the first read, sees the same
/// value.
#[must_use]
pub fn isolation_mode() -> IsolationMode {
    *MODE.get_or_init(|| {
        std::env::var(ISOLATION_ENV)
            .map(|v| IsolationMode::from_str_loose(&v))
            .unwrap_or_default()
    })
}

/// Event log destination from `MU_EVENT_LOG`, if set and non-empty.
#[must_use]
pub fn event_log_path() -> Option<PathBuf> {
    std::env::var_os(EVENT_LOG_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
