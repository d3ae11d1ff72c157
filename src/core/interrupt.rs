//! Operator interrupt (Ctrl+C) handling.
//!
//! The handler only records the request. The executor and the pipeline poll
//! it and unwind with `Error::interrupted()`, so the CLI can print a clean
//! abort line instead of dying mid-write.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

static REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install the SIGINT handler. Call once, from `main`.
pub fn install() {
    #[cfg(unix)]
    unsafe {
        libc::signal(
            libc::SIGINT,
            on_sigint as *const () as libc::sighandler_t,
        );
    }
}

#[cfg(unix)]
extern "C" fn on_sigint(_: libc::c_int) {
    request();
}

/// Record an interrupt request. Async-signal-safe.
pub fn request() {
    REQUESTED.store(true, Ordering::SeqCst);
}

pub fn requested() -> bool {
    REQUESTED.load(Ordering::SeqCst)
}

pub fn check() -> Result<()> {
    if requested() {
        Err(Error::interrupted())
    } else {
        Ok(())
    }
}
