//! Login probing subsystem.
//!
//! # Data Flow
//! ```text
//! Monitor tick
//!     → LoginProber::probe() posts credentials to the target
//!     → classified into a ProbeOutcome (outcome.rs)
//!     → consumed by metrics + (on failure) the notifier
//! ```
//!
//! # Design Decisions
//! - Every failure mode becomes an outcome value; `probe()` never returns an
//!   error, so a bad probe can never take down the scheduler loop
//! - The prober performs no side effects beyond the outbound request; metrics
//!   and alerting are the monitor's job

pub mod checker;
pub mod outcome;

pub use checker::{LoginProber, Probe};
pub use outcome::{OutcomeCategory, ProbeOutcome};
