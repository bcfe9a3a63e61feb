// Public modules
pub mod containers;
pub mod defaults;
pub mod deploy;
pub mod error;
pub mod remote;
pub mod setup;
pub mod ssh;
pub mod target;
pub mod terraform;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
