//! Notification lifecycle and bubble-queue management.
//!
//! The crate holds no I/O of its own. Storage, geometry queries, rendering,
//! sound and event delivery are reached through the traits in [`ports`].

pub mod bubble;
pub mod center;
pub mod error;
pub mod events;
pub mod policy;
pub mod ports;
pub mod registry;
pub mod settings;
pub mod types;

#[cfg(test)]
mod tests;

pub use center::{CAPABILITIES, Collaborators, CoreConfig, NotificationCenter, ServerInfo};
pub use error::{NotifyError, Result};
pub use events::{BubbleEnd, BubbleEndKind, BubbleEvent, CenterCommand, ServiceEvent, ShellEvent};
pub use types::{CloseReason, Notification, NotificationRequest, Rect};
