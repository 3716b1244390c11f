//! Ctrl+C handling for cooperative cancellation.
//!
//! A single [`ShutdownHandler`] owns an `Arc<AtomicBool>`. The flag is handed
//! to the [`Scanner`](crate::scanner::Scanner) and the
//! [`Executor`](crate::actions::Executor), which check it between entries
//! and targets. Work already started on an entry is finished, so a scan
//! never leaves a half-hashed record and an execution never leaves a
//! half-moved file.
//!
//! ```rust,no_run
//! use data_organizer::actions::Executor;
//! use data_organizer::signal::install_handler;
//!
//! let handler = install_handler();
//! let executor = Executor::new().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared cancellation flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether Ctrl+C was pressed or [`request_shutdown`](Self::request_shutdown) called.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request a shutdown without a signal.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clone of the flag for the scanner and executor.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Clear the flag so the handler can be reused.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C hook and return its handler.
///
/// The hook is registered once per process. Later calls get the same handler
/// back with its flag cleared. If the hook cannot be registered (another
/// library owns SIGINT) the handler still works for
/// [`request_shutdown`](ShutdownHandler::request_shutdown).
pub fn install_handler() -> ShutdownHandler {
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();
        let hooked = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\nInterrupted. Finishing current item...");
            let _ = stderr.flush();
            log::info!("Shutdown signal received");
        });
        if let Err(e) = hooked {
            log::debug!("Ctrl+C handler not installed: {e}");
        }
        handler
    });
    handler.reset();
    handler.clone()
}
