//! Logging setup for the hybrid chat binaries.
//!
//! Libraries only emit `tracing` events; binaries decide where they go by
//! calling [`init_tracing`] once at startup.

pub mod init;
pub mod macros;

pub use init::*;

// Re-export tracing for convenience
pub use tracing::{debug, error, info, instrument, warn};
