//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → install recorder → bind exporter → start monitor
//!
//! Monitor (monitor.rs):
//!     Starting → Running (announce, tick on interval) → Stopping → Stopped
//!
//! Shutdown (shutdown.rs):
//!     SIGTERM/SIGINT → broadcast → monitor and exporter drain and exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: config and port-bind errors abort before the first tick
//! - A bad tick never terminates the Running state
//! - Shutdown lets the in-flight tick and notification finish; no new tick
//!   starts afterwards

pub mod monitor;
pub mod shutdown;

pub use monitor::Monitor;
pub use shutdown::{wait_for_signal, Shutdown};
