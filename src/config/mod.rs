//! Configuration subsystem.
//!
//! # Responsibilities
//! - Define the immutable startup configuration (schema.rs)
//! - Load and validate it from the environment (loader.rs)
//!
//! # Design Decisions
//! - Loaded exactly once at startup; no reload, no partial operation
//! - All missing required keys are reported together, not one at a time
//! - Any validation failure is fatal before scheduling begins

pub mod loader;
pub mod schema;

pub use loader::ConfigError;
pub use schema::Config;
