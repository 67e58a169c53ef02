//! Minarets Player CLI Library
//!
//! Configuration, a simulated audio output, and the text rendering used by
//! the `minarets-player` binary.
//!
//! This library exposes the core components for testing purposes.

pub mod config;
pub mod error;
pub mod report;
pub mod simulated;

// Re-export commonly used types for convenience
pub use crate::config::{ApiSettings, AppConfig};
pub use error::{CliError, Result};
pub use simulated::{run_until_idle, PlaybackSummary, SimulatedOutput};
