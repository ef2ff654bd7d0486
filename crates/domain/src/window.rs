use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Utc};
use impersonate_core::{AppError, AppResult, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a permission window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionWindowId(Uuid);

impl PermissionWindowId {
    /// Creates a random window identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a window identifier from an existing UUID value.
    #[must_use]
    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    /// Parses a window identifier from its transport representation.
    pub fn parse(value: &str) -> AppResult<Self> {
        Uuid::parse_str(value.trim())
            .map(Self)
            .map_err(|_| AppError::Validation(format!("invalid window_id '{value}'")))
    }

    /// Returns the underlying UUID value.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PermissionWindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for PermissionWindowId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Time range during which a user permits staff to impersonate their account.
///
/// A window is active while it is enabled and the current instant lies
/// strictly between its start and end. Start and end ordering is not
/// validated; an inverted range is simply never active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionWindow {
    id: PermissionWindowId,
    user_id: UserId,
    window_starts_at: DateTime<Utc>,
    window_ends_at: DateTime<Utc>,
    is_enabled: bool,
    created_at: DateTime<Utc>,
}

impl PermissionWindow {
    /// Creates a new enabled window for `user_id` spanning `now..now + expiry`.
    #[must_use]
    pub fn open(user_id: UserId, now: DateTime<Utc>, expiry: Duration) -> Self {
        Self::new(
            PermissionWindowId::new(),
            user_id,
            now,
            now + expiry,
            true,
            now,
        )
    }

    /// Rebuilds a window from stored values.
    #[must_use]
    pub fn new(
        id: PermissionWindowId,
        user_id: UserId,
        window_starts_at: DateTime<Utc>,
        window_ends_at: DateTime<Utc>,
        is_enabled: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            user_id,
            window_starts_at,
            window_ends_at,
            is_enabled,
            created_at,
        }
    }

    /// Returns the window identifier.
    #[must_use]
    pub fn id(&self) -> PermissionWindowId {
        self.id
    }

    /// Returns the user whose account may be impersonated.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns when the window begins.
    #[must_use]
    pub fn window_starts_at(&self) -> DateTime<Utc> {
        self.window_starts_at
    }

    /// Returns when the window ends.
    #[must_use]
    pub fn window_ends_at(&self) -> DateTime<Utc> {
        self.window_ends_at
    }

    /// Returns the kill switch value.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// Returns when the record was created.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns true if the window is enabled and `now` is strictly inside it.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.is_enabled && self.window_starts_at < now && now < self.window_ends_at
    }

    /// Returns true if the window is enabled and open right now.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active_at(Utc::now())
    }

    /// Returns the time left until the window ends. Negative once expired.
    #[must_use]
    pub fn ttl_at(&self, now: DateTime<Utc>) -> Duration {
        self.window_ends_at - now
    }

    /// Returns the time left until the window ends, measured from now.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl_at(Utc::now())
    }

    /// Flips the kill switch off. Callers persist the change.
    pub fn disable(&mut self) {
        self.is_enabled = false;
    }

    /// Applies an administrative edit.
    pub fn apply_changes(
        &mut self,
        window_starts_at: Option<DateTime<Utc>>,
        window_ends_at: Option<DateTime<Utc>>,
        is_enabled: Option<bool>,
    ) {
        if let Some(value) = window_starts_at {
            self.window_starts_at = value;
        }
        if let Some(value) = window_ends_at {
            self.window_ends_at = value;
        }
        if let Some(value) = is_enabled {
            self.is_enabled = value;
        }
    }
}

impl Display for PermissionWindow {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "Impersonate permissions window [{}] for {}",
            self.id, self.user_id
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use impersonate_core::UserId;
    use proptest::prelude::*;

    use super::{PermissionWindow, PermissionWindowId};

    fn window(starts: i64, ends: i64, enabled: bool) -> PermissionWindow {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single();
        let base = base.unwrap_or_else(Utc::now);
        PermissionWindow::new(
            PermissionWindowId::new(),
            UserId::new(),
            base + Duration::minutes(starts),
            base + Duration::minutes(ends),
            enabled,
            base,
        )
    }

    fn at(minutes: i64) -> chrono::DateTime<Utc> {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).single();
        base.unwrap_or_else(Utc::now) + Duration::minutes(minutes)
    }

    #[test]
    fn active_only_strictly_inside_the_range() {
        let window = window(0, 60, true);

        assert!(!window.is_active_at(at(-1)));
        assert!(!window.is_active_at(at(0)));
        assert!(window.is_active_at(at(30)));
        assert!(!window.is_active_at(at(60)));
        assert!(!window.is_active_at(at(61)));
    }

    #[test]
    fn disabled_window_is_never_active() {
        let mut window = window(0, 60, true);
        window.disable();

        assert!(!window.is_enabled());
        assert!(!window.is_active_at(at(30)));
    }

    #[test]
    fn inverted_range_is_never_active() {
        let window = window(60, 0, true);
        assert!(!window.is_active_at(at(30)));
    }

    #[test]
    fn ttl_goes_negative_after_expiry() {
        let window = window(0, 60, true);

        assert_eq!(window.ttl_at(at(20)), Duration::minutes(40));
        assert_eq!(window.ttl_at(at(90)), Duration::minutes(-30));
    }

    #[test]
    fn ttl_counts_down_from_the_current_time() {
        let window = PermissionWindow::open(UserId::new(), Utc::now(), Duration::minutes(30));
        let ttl = window.ttl();

        assert!(ttl <= Duration::minutes(30));
        assert!(ttl > Duration::minutes(29));
        assert!(window.window_ends_at() - ttl <= Utc::now());
    }

    #[test]
    fn open_uses_default_expiry() {
        let now = at(0);
        let window = PermissionWindow::open(UserId::new(), now, Duration::minutes(60));

        assert!(window.is_enabled());
        assert_eq!(window.window_starts_at(), now);
        assert_eq!(window.window_ends_at(), at(60));
        assert_eq!(window.created_at(), now);
    }

    #[test]
    fn apply_changes_leaves_unset_fields() {
        let mut window = window(0, 60, true);
        window.apply_changes(None, Some(at(120)), Some(false));

        assert_eq!(window.window_starts_at(), at(0));
        assert_eq!(window.window_ends_at(), at(120));
        assert!(!window.is_enabled());
    }

    #[test]
    fn display_names_window_and_user() {
        let window = window(0, 60, true);
        let rendered = window.to_string();

        assert!(rendered.starts_with("Impersonate permissions window ["));
        assert!(rendered.ends_with(window.user_id().to_string().as_str()));
    }

    proptest! {
        #[test]
        fn active_matches_enabled_and_open_interval(
            starts in -500i64..500,
            ends in -500i64..500,
            moment in -600i64..600,
            enabled in any::<bool>(),
        ) {
            let window = window(starts, ends, enabled);
            let expected = enabled && starts < moment && moment < ends;
            prop_assert_eq!(window.is_active_at(at(moment)), expected);
        }
    }
}
