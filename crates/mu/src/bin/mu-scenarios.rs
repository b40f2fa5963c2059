//! Drives the process-wide session through one scenario and exits.
//!
//! Used by the process-level tests to observe stderr, at-exit finalization and
//! the exit status of a real process.

use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mu::{
    mu_assert, mu_assert_int_eq, mu_assert_int_lt, mu_assert_ptr_eq, mu_assert_str_eq,
    mu_assert_str_ne, mu_assert_uint_ge, mu_exit, mu_fassert, mu_final, mu_init, mu_run,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// `2 == 2` then `2 == 3`, explicit exit.
    Mixed,
    /// One isolated body with two passing assertions.
    IsolatedPass,
    /// A fatal failure in one isolated body, a passing body after it.
    IsolatedFatal,
    /// An isolated body aborts before reporting, a passing body after it.
    IsolatedCrash,
    /// An isolated body calls `exit` after one passing assertion.
    IsolatedExit,
    /// A fatal failure at top level ends the process after finalizing.
    FatalTop,
    /// String comparisons including a null operand.
    Strings,
    /// A failing run left open when `main` returns.
    AtexitFail,
    /// A passing run left open when `main` returns.
    AtexitPass,
    /// Two runs in one process; the second starts from zero.
    Reinit,
}

/// Assertion runtime scenarios.
#[derive(Debug, Parser)]
#[command(name = "mu-scenarios")]
#[command(about = "Run one assertion runtime scenario against the process-wide session")]
struct Cli {
    #[arg(value_enum)]
    scenario: Scenario,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.scenario {
        Scenario::Mixed => {
            mu_init!("mixed");
            mu_assert!(2 == 2);
            mu_assert!(2 == 3);
            mu_exit!()
        }
        Scenario::IsolatedPass => {
            mu_init!("isolated");
            mu_run!({
                mu_assert_int_eq!(1, 1);
                mu_assert_int_eq!(1, 1);
            });
            mu_exit!()
        }
        Scenario::IsolatedFatal => {
            mu_init!("fatal");
            mu_run!({
                mu_assert!(true);
                mu_fassert!(1 > 2);
                mu_assert!(false);
            });
            mu_run!({
                mu_assert_uint_ge!(3_u32, 3_u32);
            });
            mu_exit!()
        }
        Scenario::IsolatedCrash => {
            mu_init!("crash");
            mu_run!({
                mu_assert!(true);
                std::process::abort();
            });
            mu_run!({
                mu_assert_int_lt!(-1, 0);
            });
            mu_exit!()
        }
        Scenario::IsolatedExit => {
            mu_init!("exiting");
            mu_run!({
                mu_assert!(true);
                std::process::exit(0);
            });
            mu_exit!()
        }
        Scenario::FatalTop => {
            mu_init!("fatal");
            mu_fassert!(1 == 2);
            mu_assert!(false);
            eprintln!("continued after fatal");
            mu_exit!()
        }
        Scenario::Strings => {
            let owned = String::from("ab");
            let null: Option<&str> = None;
            mu_init!("strings");
            mu_assert_str_eq!("ab", &owned);
            mu_assert_str_eq!("ab", null);
            mu_assert_str_ne!(null, null);
            mu_assert_ptr_eq!(&owned, &owned);
            mu_exit!()
        }
        Scenario::AtexitFail => {
            mu_init!("atexit");
            mu_assert!(1 + 1 == 3);
            ExitCode::SUCCESS
        }
        Scenario::AtexitPass => {
            mu_init!("atexit");
            mu_assert!(1 + 1 == 2);
            ExitCode::SUCCESS
        }
        Scenario::Reinit => {
            mu_init!("first");
            mu_assert!(false);
            let first = mu_final!();
            mu_init!("second");
            mu_assert!(true);
            mu_assert!(first != mu::RunStatus::Success);
            mu_final!().into()
        }
    }
}
