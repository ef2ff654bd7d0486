use async_trait::async_trait;

use impersonate_core::{AppResult, UserId};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

use super::inputs::{PermissionWindowFilter, PermissionWindowListQuery};
use super::projections::{OpenImpersonationSession, PermissionWindowListEntry, UserSummary};

/// Repository port for permission window persistence.
#[async_trait]
pub trait PermissionWindowRepository: Send + Sync {
    /// Disables the owner's active windows and inserts `window`, as one
    /// atomic unit. At most one window per user is active afterwards.
    async fn create_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow>;

    /// Lists a user's active windows ordered by start, then end, ascending.
    async fn list_active_windows(&self, user_id: UserId) -> AppResult<Vec<PermissionWindow>>;

    /// Finds a window by id.
    async fn find_window(
        &self,
        window_id: PermissionWindowId,
    ) -> AppResult<Option<PermissionWindow>>;

    /// Disables one window and persists the row immediately.
    async fn disable_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow>;

    /// Persists an edited window.
    async fn update_window(&self, window: &PermissionWindow) -> AppResult<()>;

    /// Bulk-disables every window matching `filter` in one statement, without
    /// loading rows. Returns the number of rows changed.
    async fn disable_windows(&self, filter: PermissionWindowFilter) -> AppResult<u64>;

    /// Lists windows with their owners for administration.
    async fn list_windows(
        &self,
        query: PermissionWindowListQuery,
    ) -> AppResult<Vec<PermissionWindowListEntry>>;

    /// Lists distinct users with at least one active window, ordered by
    /// first name then last name.
    async fn list_impersonable_users(&self) -> AppResult<Vec<UserSummary>>;
}

/// Read-only port over the external impersonation system's session log.
#[async_trait]
pub trait ImpersonationSessionRepository: Send + Sync {
    /// Lists sessions on `user_id` that have started and not ended.
    async fn list_open_sessions(&self, user_id: UserId)
    -> AppResult<Vec<OpenImpersonationSession>>;
}
