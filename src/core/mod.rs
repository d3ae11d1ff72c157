// Public modules
pub mod artifacts;
pub mod bootstrap;
pub mod console;
pub mod context;
pub mod defaults;
pub mod error;
pub mod executor;
pub mod interrupt;
pub mod pipeline;
pub mod preflight;
pub mod publish;
pub mod remote;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
