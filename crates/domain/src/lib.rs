//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod message;
mod window;

pub use message::{
    FlashMessage, MessageLevel, MessageSubject, WindowMessageKind, format_window_message,
};
pub use window::{PermissionWindow, PermissionWindowId};
