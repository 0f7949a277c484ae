//! Alert delivery subsystem.
//!
//! # Design Decisions
//! - Delivery failures never cross the [`Alert::notify`] boundary; a broken
//!   alert channel must not become a second source of instability
//! - At most one delivery attempt per call, no retry, no queueing

pub mod telegram;

pub use telegram::{NotifyError, TelegramNotifier};

/// Seam between the monitor loop and the concrete notifier.
///
/// Implementations log and swallow their own errors; `notify` cannot fail
/// from the caller's point of view.
pub trait Alert {
    fn notify(&self, text: &str) -> impl std::future::Future<Output = ()> + Send;
}
