//! View-state components: the toast stack and the unread badge.
//!
//! These are created once at startup and passed by reference to whichever
//! handler needs them; nothing here is process-global.

pub mod badge;
pub mod toast;

pub use badge::UnreadBadge;
pub use toast::{CallToAction, Toast, ToastKind, ToastStack};
