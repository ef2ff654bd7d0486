use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use impersonate_application::{
    ImpersonationSessionRepository, OpenImpersonationSession, PermissionWindowFilter,
    PermissionWindowListEntry, PermissionWindowListQuery, PermissionWindowRepository,
    UserSummary,
};
use impersonate_core::{AppError, AppResult, UserId};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

#[cfg(test)]
mod tests;

const MAX_LIST_LIMIT: usize = 200;
const MAX_LIST_OFFSET: usize = 5_000;

/// In-memory permission window repository implementation.
#[derive(Debug, Default)]
pub struct InMemoryPermissionWindowRepository {
    windows: RwLock<HashMap<PermissionWindowId, PermissionWindow>>,
    users: RwLock<HashMap<UserId, UserSummary>>,
}

impl InMemoryPermissionWindowRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user so windows can be created for them.
    pub async fn add_user(&self, user: UserSummary) {
        self.users.write().await.insert(user.user_id, user);
    }
}

#[async_trait]
impl PermissionWindowRepository for InMemoryPermissionWindowRepository {
    async fn create_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow> {
        if !self.users.read().await.contains_key(&window.user_id()) {
            return Err(AppError::NotFound(format!("user '{}'", window.user_id())));
        }

        // Held across disable and insert so concurrent creates cannot interleave.
        let mut windows = self.windows.write().await;
        let now = Utc::now();
        for stored in windows.values_mut() {
            if stored.user_id() == window.user_id() && stored.is_active_at(now) {
                stored.disable();
            }
        }

        windows.insert(window.id(), window.clone());
        Ok(window)
    }

    async fn list_active_windows(&self, user_id: UserId) -> AppResult<Vec<PermissionWindow>> {
        let now = Utc::now();
        let windows = self.windows.read().await;

        let mut active: Vec<PermissionWindow> = windows
            .values()
            .filter(|window| window.user_id() == user_id && window.is_active_at(now))
            .cloned()
            .collect();
        active.sort_by_key(|window| (window.window_starts_at(), window.window_ends_at()));

        Ok(active)
    }

    async fn find_window(
        &self,
        window_id: PermissionWindowId,
    ) -> AppResult<Option<PermissionWindow>> {
        Ok(self.windows.read().await.get(&window_id).cloned())
    }

    async fn disable_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow> {
        let mut windows = self.windows.write().await;
        let stored = windows
            .get_mut(&window.id())
            .ok_or_else(|| AppError::NotFound(format!("permission window '{}'", window.id())))?;

        stored.disable();
        Ok(stored.clone())
    }

    async fn update_window(&self, window: &PermissionWindow) -> AppResult<()> {
        let mut windows = self.windows.write().await;
        let stored = windows
            .get_mut(&window.id())
            .ok_or_else(|| AppError::NotFound(format!("permission window '{}'", window.id())))?;

        *stored = window.clone();
        Ok(())
    }

    async fn disable_windows(&self, filter: PermissionWindowFilter) -> AppResult<u64> {
        let now = Utc::now();
        let mut windows = self.windows.write().await;

        let mut disabled = 0;
        for window in windows.values_mut() {
            let user_matches = filter
                .user_id
                .is_none_or(|user_id| window.user_id() == user_id);
            let state_matches = !filter.active_only || window.is_active_at(now);

            if window.is_enabled() && user_matches && state_matches {
                window.disable();
                disabled += 1;
            }
        }

        Ok(disabled)
    }

    async fn list_windows(
        &self,
        query: PermissionWindowListQuery,
    ) -> AppResult<Vec<PermissionWindowListEntry>> {
        let windows = self.windows.read().await;
        let users = self.users.read().await;
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        let mut entries: Vec<PermissionWindowListEntry> = windows
            .values()
            .filter(|window| {
                query
                    .user_id
                    .is_none_or(|user_id| window.user_id() == user_id)
            })
            .filter_map(|window| {
                users.get(&window.user_id()).map(|user| PermissionWindowListEntry {
                    window: window.clone(),
                    user: user.clone(),
                })
            })
            .filter(|entry| {
                search
                    .as_deref()
                    .is_none_or(|needle| user_matches_search(&entry.user, needle))
            })
            .collect();
        entries.sort_by(|left, right| right.window.created_at().cmp(&left.window.created_at()));

        Ok(entries
            .into_iter()
            .skip(query.offset.min(MAX_LIST_OFFSET))
            .take(query.limit.clamp(1, MAX_LIST_LIMIT))
            .collect())
    }

    async fn list_impersonable_users(&self) -> AppResult<Vec<UserSummary>> {
        let now = Utc::now();
        let windows = self.windows.read().await;
        let users = self.users.read().await;

        let mut impersonable: Vec<UserSummary> = users
            .values()
            .filter(|user| {
                windows
                    .values()
                    .any(|window| window.user_id() == user.user_id && window.is_active_at(now))
            })
            .cloned()
            .collect();
        impersonable.sort_by(|left, right| {
            left.first_name
                .cmp(&right.first_name)
                .then_with(|| left.last_name.cmp(&right.last_name))
                .then_with(|| left.username.cmp(&right.username))
        });

        Ok(impersonable)
    }
}

fn user_matches_search(user: &UserSummary, needle: &str) -> bool {
    [
        Some(user.first_name.as_str()),
        Some(user.last_name.as_str()),
        user.email.as_deref(),
        Some(user.username.as_str()),
    ]
    .into_iter()
    .flatten()
    .any(|value| value.to_lowercase().contains(needle))
}

/// In-memory impersonation session log.
#[derive(Debug, Default)]
pub struct InMemoryImpersonationSessionRepository {
    sessions: RwLock<Vec<OpenImpersonationSession>>,
}

impl InMemoryImpersonationSessionRepository {
    /// Creates an empty session log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a started session.
    pub async fn open_session(&self, session: OpenImpersonationSession) {
        self.sessions.write().await.push(session);
    }

    /// Removes a session by key, as when the external system ends it.
    pub async fn end_session(&self, session_key: &str) {
        self.sessions
            .write()
            .await
            .retain(|session| session.session_key != session_key);
    }
}

#[async_trait]
impl ImpersonationSessionRepository for InMemoryImpersonationSessionRepository {
    async fn list_open_sessions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<OpenImpersonationSession>> {
        let now = Utc::now();
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .filter(|session| {
                session.impersonating_user_id == user_id && session.session_started_at <= now
            })
            .cloned()
            .collect())
    }
}
