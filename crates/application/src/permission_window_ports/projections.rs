use chrono::{DateTime, Utc};

use impersonate_core::UserId;
use impersonate_domain::PermissionWindow;

/// Read model of a user account owned by the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSummary {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email, when known.
    pub email: Option<String>,
}

impl UserSummary {
    /// Returns "first last", or the username when both are blank.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full_name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full_name = full_name.trim();
        if full_name.is_empty() {
            self.username.clone()
        } else {
            full_name.to_owned()
        }
    }
}

/// Admin listing row: a window with its owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWindowListEntry {
    /// Stored window.
    pub window: PermissionWindow,
    /// Window owner.
    pub user: UserSummary,
}

/// Impersonation session the external system has not closed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenImpersonationSession {
    /// Session key recorded by the external system.
    pub session_key: String,
    /// Staff member acting as the user.
    pub impersonator: UserSummary,
    /// Account being impersonated.
    pub impersonating_user_id: UserId,
    /// When the session started.
    pub session_started_at: DateTime<Utc>,
}
