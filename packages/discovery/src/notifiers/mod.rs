//! Notification implementations.

pub mod expo;

pub use expo::{ExpoNotifier, NoopNotifier};
