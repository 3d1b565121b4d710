//! Ctrl+C handling for long-running history walks.

use std::sync::atomic::{AtomicBool, Ordering};

static CANCELLED: AtomicBool = AtomicBool::new(false);

/// Whether the user asked to stop.
pub fn is_cancelled() -> bool {
    CANCELLED.load(Ordering::SeqCst)
}

/// Flag the current run as cancelled, as the Ctrl+C handler does.
pub fn request() {
    CANCELLED.store(true, Ordering::SeqCst);
}

/// Install the Ctrl+C handler. Installing twice is a no-op.
pub fn register_handler() {
    if let Err(err) = ctrlc::set_handler(request) {
        log::debug!("Ctrl+C handler not installed: {}", err);
    }
}
