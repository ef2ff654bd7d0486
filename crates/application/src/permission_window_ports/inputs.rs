use chrono::{DateTime, Duration, Utc};

use impersonate_core::UserId;
use impersonate_domain::{PermissionWindow, PermissionWindowId};

/// Input payload for creating a permission window.
///
/// Unset bounds default to `now` and `now + default expiry`; unset
/// `is_enabled` defaults to true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePermissionWindowInput {
    /// Owner of the account that may be impersonated.
    pub user_id: UserId,
    /// Optional start of the window.
    pub window_starts_at: Option<DateTime<Utc>>,
    /// Optional end of the window.
    pub window_ends_at: Option<DateTime<Utc>>,
    /// Optional kill switch value.
    pub is_enabled: Option<bool>,
}

impl CreatePermissionWindowInput {
    /// Creates an input that takes every default.
    #[must_use]
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            window_starts_at: None,
            window_ends_at: None,
            is_enabled: None,
        }
    }

    /// Resolves defaults into a new window value.
    #[must_use]
    pub fn into_window(self, now: DateTime<Utc>, default_expiry: Duration) -> PermissionWindow {
        PermissionWindow::new(
            PermissionWindowId::new(),
            self.user_id,
            self.window_starts_at.unwrap_or(now),
            self.window_ends_at.unwrap_or(now + default_expiry),
            self.is_enabled.unwrap_or(true),
            now,
        )
    }
}

/// Administrative edit of a stored window. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdatePermissionWindowInput {
    /// New start of the window.
    pub window_starts_at: Option<DateTime<Utc>>,
    /// New end of the window.
    pub window_ends_at: Option<DateTime<Utc>>,
    /// New kill switch value.
    pub is_enabled: Option<bool>,
}

/// Selection used by bulk disable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionWindowFilter {
    /// Restrict to one user's windows.
    pub user_id: Option<UserId>,
    /// Restrict to windows active at the time of the update.
    pub active_only: bool,
}

impl PermissionWindowFilter {
    /// Selects a user's currently active windows.
    #[must_use]
    pub fn active_for_user(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            active_only: true,
        }
    }
}

/// Query parameters for the administrative window listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWindowListQuery {
    /// Case-insensitive match on owner first name, last name, email or username.
    pub search: Option<String>,
    /// Optional owner filter.
    pub user_id: Option<UserId>,
    /// Maximum rows returned.
    pub limit: usize,
    /// Number of rows skipped for pagination.
    pub offset: usize,
}

impl Default for PermissionWindowListQuery {
    fn default() -> Self {
        Self {
            search: None,
            user_id: None,
            limit: 50,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use impersonate_core::UserId;

    use super::CreatePermissionWindowInput;

    #[test]
    fn defaults_span_now_to_default_expiry() {
        let now = Utc::now();
        let user_id = UserId::new();

        let window =
            CreatePermissionWindowInput::for_user(user_id).into_window(now, Duration::minutes(60));

        assert_eq!(window.user_id(), user_id);
        assert_eq!(window.window_starts_at(), now);
        assert_eq!(window.window_ends_at(), now + Duration::minutes(60));
        assert!(window.is_enabled());
    }

    #[test]
    fn explicit_values_win_over_defaults() {
        let now = Utc::now();
        let input = CreatePermissionWindowInput {
            user_id: UserId::new(),
            window_starts_at: Some(now - Duration::hours(1)),
            window_ends_at: Some(now + Duration::hours(2)),
            is_enabled: Some(false),
        };

        let window = input.into_window(now, Duration::minutes(60));

        assert_eq!(window.window_starts_at(), now - Duration::hours(1));
        assert_eq!(window.window_ends_at(), now + Duration::hours(2));
        assert!(!window.is_enabled());
        assert_eq!(window.created_at(), now);
    }
}
