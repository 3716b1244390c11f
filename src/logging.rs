//! Logging setup for the `data-organizer` binary.
//!
//! Library code only talks to the `log` facade; this module installs the
//! `env_logger` backend. The level comes from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. CLI flags: `-q` (errors only), `-v` (debug), `-vv` (trace)
//! 3. Default: info
//!
//! Without `RUST_LOG`, dependencies are held at `warn` so `-vv` traces only
//! this crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use data_organizer::logging::init_logging;
//!
//! init_logging(1, false);
//! log::debug!("visible with -v");
//! ```

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Install the global logger from CLI verbosity flags.
///
/// Returns `false` if a logger was already installed (for example when
/// several tests drive the binary entry point in one process); the existing
/// logger is left untouched.
pub fn init_logging(verbose: u8, quiet: bool) -> bool {
    let from_env = env::var_os("RUST_LOG").is_some();
    let level = determine_level(verbose, quiet);

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder
            .filter_level(LevelFilter::Warn.min(level))
            .filter_module(env!("CARGO_CRATE_NAME"), level);
    }
    configure_format(&mut builder, verbose);

    let installed = builder.try_init().is_ok();
    if installed {
        if from_env {
            log::debug!("Logging configured from RUST_LOG");
        } else {
            log::debug!("Logging initialized at level: {level}");
        }
    }
    installed
}

/// Map CLI flags to a level; `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Debug builds stamp every line and show the module path once `-v` is
/// given; release builds print level and message only.
fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let style = buf.default_level_style(level);
        if verbose >= 1 {
            writeln!(
                buf,
                "{timestamp} {style}{level:<5}{style:#} [{}] {}",
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(buf, "{timestamp} {style}{level:<5}{style:#} {}", record.args())
        }
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{level:<5}{style:#} {}", record.args())
        });
    }
}

/// Name of the currently active maximum level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
