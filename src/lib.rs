//! Login Sentinel Library
//!
//! A scheduled probing and alerting daemon. On a fixed interval it posts a
//! synthetic login to a target endpoint, exports Prometheus metrics about the
//! outcome, and pushes a Telegram alert on every failing check.
//!
//! ```text
//!                 ┌──────────────────────────────────────────────┐
//!                 │                LOGIN SENTINEL                 │
//!                 │                                               │
//!   timer tick    │  ┌───────────┐      ┌────────────────────┐   │
//!   ──────────────┼─▶│ lifecycle │─────▶│       probe        │───┼──▶ login endpoint
//!                 │  │  monitor  │◀─────│  (outcome value)   │   │    (HTTP POST)
//!                 │  └─────┬─────┘      └────────────────────┘   │
//!                 │        │                                     │
//!                 │        ├──────────▶ observability::metrics ──┼──▶ GET /metrics
//!                 │        │            (counter/histogram/gauge)│    (Prometheus)
//!                 │        │                                     │
//!                 │        └─on failure▶ notify::telegram ───────┼──▶ Telegram chat
//!                 │                      (errors swallowed)      │
//!                 └──────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod probe;

pub use config::Config;
pub use lifecycle::{Monitor, Shutdown};
pub use notify::{Alert, TelegramNotifier};
pub use probe::{LoginProber, Probe, ProbeOutcome};
