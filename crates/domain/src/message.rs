use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::PermissionWindow;

/// Severity of a user-facing flash message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageLevel {
    /// Informational notice.
    Info,
    /// Something the user should act on soon.
    Warning,
}

impl MessageLevel {
    /// Returns a stable transport value for this level.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Kinds of message emitted around a permission window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMessageKind {
    /// Staff member is impersonating inside an active window.
    Impersonating,
    /// No active window is left; impersonation is being ended.
    Expired,
    /// The account owner is being told an impersonation session is open.
    Impersonated,
}

/// Plain structured message delivered through whatever UI layer exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    /// Message severity.
    pub level: MessageLevel,
    /// Rendered text.
    pub text: String,
}

impl FlashMessage {
    /// Creates a message from a level and text.
    #[must_use]
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// Values a window message may refer to.
#[derive(Debug, Clone, Copy)]
pub enum MessageSubject<'a> {
    /// The active window and the name of the impersonated account.
    Window {
        /// Active window.
        window: &'a PermissionWindow,
        /// Display name of the impersonated user.
        impersonating: &'a str,
        /// Instant the remaining time is measured from.
        now: DateTime<Utc>,
    },
    /// Display name of the staff member holding an open session.
    Impersonator(&'a str),
    /// Nothing to interpolate.
    None,
}

/// Renders the text for a window message.
#[must_use]
pub fn format_window_message(
    kind: WindowMessageKind,
    level: MessageLevel,
    subject: MessageSubject<'_>,
) -> FlashMessage {
    let text = match (kind, subject) {
        (
            WindowMessageKind::Impersonating,
            MessageSubject::Window {
                window,
                impersonating,
                now,
            },
        ) => {
            let minutes = window.ttl_at(now).num_minutes().max(0);
            let ends_at = window
                .window_ends_at()
                .to_rfc3339_opts(SecondsFormat::Secs, true);
            let prefix = match level {
                MessageLevel::Warning => "Permission window closing soon. ",
                MessageLevel::Info => "",
            };
            format!(
                "{prefix}You are impersonating {impersonating}. \
                 Permission expires in {minutes} minutes (at {ends_at})."
            )
        }
        (WindowMessageKind::Impersonating, _) => "You are impersonating another user.".to_owned(),
        (WindowMessageKind::Expired, _) => {
            "The impersonation permission window has expired; impersonation has ended.".to_owned()
        }
        (WindowMessageKind::Impersonated, MessageSubject::Impersonator(impersonator)) => {
            format!("Your account is currently being accessed by {impersonator}.")
        }
        (WindowMessageKind::Impersonated, _) => {
            "Your account is currently being accessed by a staff member.".to_owned()
        }
    };

    FlashMessage::new(level, text)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use impersonate_core::UserId;

    use super::{MessageLevel, MessageSubject, WindowMessageKind, format_window_message};
    use crate::PermissionWindow;

    #[test]
    fn impersonating_message_reports_remaining_minutes() {
        let now = Utc::now();
        let window = PermissionWindow::open(UserId::new(), now, Duration::minutes(30));

        let message = format_window_message(
            WindowMessageKind::Impersonating,
            MessageLevel::Info,
            MessageSubject::Window {
                window: &window,
                impersonating: "Max",
                now,
            },
        );

        assert_eq!(message.level, MessageLevel::Info);
        assert!(message.text.starts_with("You are impersonating Max."));
        assert!(message.text.contains("expires in 30 minutes"));
    }

    #[test]
    fn warning_message_is_prefixed() {
        let now = Utc::now();
        let window = PermissionWindow::open(UserId::new(), now, Duration::minutes(5));

        let message = format_window_message(
            WindowMessageKind::Impersonating,
            MessageLevel::Warning,
            MessageSubject::Window {
                window: &window,
                impersonating: "Max",
                now,
            },
        );

        assert_eq!(message.level, MessageLevel::Warning);
        assert!(message.text.starts_with("Permission window closing soon."));
    }

    #[test]
    fn impersonated_message_names_impersonator() {
        let message = format_window_message(
            WindowMessageKind::Impersonated,
            MessageLevel::Info,
            MessageSubject::Impersonator("Alice Admin"),
        );

        assert_eq!(
            message.text,
            "Your account is currently being accessed by Alice Admin."
        );
    }

    #[test]
    fn level_transport_values_are_stable() {
        assert_eq!(MessageLevel::Info.as_str(), "info");
        assert_eq!(MessageLevel::Warning.as_str(), "warning");
    }
}
