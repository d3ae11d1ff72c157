/// Operator log lines on stderr, timestamped and colored.
///
/// Usage:
/// ```ignore
/// log_info!("Creating repository: {}...", full_name);
/// log_warn!("{}: {}", step, message);
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::core::console::emit($crate::core::console::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_success {
    ($($arg:tt)*) => {
        $crate::core::console::emit($crate::core::console::Level::Success, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::core::console::emit($crate::core::console::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::core::console::emit($crate::core::console::Level::Error, &format!($($arg)*))
    };
}

/// Indented continuation line under the previous message.
#[macro_export]
macro_rules! log_detail {
    ($($arg:tt)*) => {
        $crate::core::console::emit($crate::core::console::Level::Detail, &format!($($arg)*))
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `repolaunch::pipeline` instead of `repolaunch::core::pipeline`
pub use crate::core::*;
