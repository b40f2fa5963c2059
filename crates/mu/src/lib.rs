//! # mu
//!
//! A small embeddable assertion runtime.
//!
//! Assertions are counted in one atomic word per [`Session`]; failures print
//! `<file>:<line>: <message>` as they happen and the run ends with a summary
//! line and a binary exit status. Test bodies can run in an isolated worker
//! (a forked child on unix) so that a crash or fatal assertion in one body
//! does not end the run; the child's counts are carried back through a shared
//! anonymous mapping and folded into the parent.
//!
//! ```no_run
//! use mu::{mu_assert, mu_assert_int_eq, mu_assert_str_eq, mu_init, mu_run};
//!
//! mu_init!("example");
//! mu_assert!(1 + 1 == 2);
//! mu_run!({
//!     mu_assert_int_eq!(2 * 2, 4);
//!     mu_assert_str_eq!("ab", "ab");
//! });
//! // The run is finalized and reported at process exit.
//! ```

pub mod assert;
pub mod compare;
pub mod config;
pub mod counters;
pub mod error;
pub mod events;
pub mod isolate;
mod macros;
pub mod report;
pub mod session;
pub mod shared;

pub use assert::{Severity, Site};
pub use compare::{CmpOp, Exprs};
pub use config::{IsolationMode, ReportConfig};
pub use counters::{RunCounters, Tally};
pub use error::{EventLogError, IsolationError};
pub use events::{EventEntry, EventKind, EventLog, Outcome};
#[cfg(unix)]
pub use isolate::ForkWorker;
pub use isolate::{InlineWorker, IsolatedWorker, WorkerExit, WorkerReport, negotiate_worker};
pub use report::RunStatus;
pub use session::{Session, Sink};
