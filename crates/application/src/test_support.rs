use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use impersonate_core::{AppError, AppResult, UserId, UserIdentity};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

use crate::permission_window_ports::{
    ImpersonationSessionRepository, OpenImpersonationSession, PermissionWindowFilter,
    PermissionWindowListEntry, PermissionWindowListQuery, PermissionWindowRepository,
    UserSummary,
};

#[derive(Default)]
pub(crate) struct FakePermissionWindowRepository {
    pub(crate) windows: Mutex<Vec<PermissionWindow>>,
    pub(crate) users: Mutex<HashMap<UserId, UserSummary>>,
}

impl FakePermissionWindowRepository {
    pub(crate) async fn add_user(&self, identity: &UserIdentity) {
        self.users.lock().await.insert(
            identity.user_id(),
            UserSummary {
                user_id: identity.user_id(),
                username: identity.username().to_owned(),
                first_name: identity.display_name().to_owned(),
                last_name: String::new(),
                email: identity.email().map(str::to_owned),
            },
        );
    }

    pub(crate) async fn stored(&self, window_id: PermissionWindowId) -> Option<PermissionWindow> {
        self.windows
            .lock()
            .await
            .iter()
            .find(|window| window.id() == window_id)
            .cloned()
    }
}

#[async_trait]
impl PermissionWindowRepository for FakePermissionWindowRepository {
    async fn create_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow> {
        let now = Utc::now();
        let mut windows = self.windows.lock().await;
        for stored in windows.iter_mut() {
            if stored.user_id() == window.user_id() && stored.is_active_at(now) {
                stored.disable();
            }
        }
        windows.push(window.clone());
        Ok(window)
    }

    async fn list_active_windows(&self, user_id: UserId) -> AppResult<Vec<PermissionWindow>> {
        let now = Utc::now();
        let mut active: Vec<PermissionWindow> = self
            .windows
            .lock()
            .await
            .iter()
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
        Ok(self.stored(window_id).await)
    }

    async fn disable_window(&self, mut window: PermissionWindow) -> AppResult<PermissionWindow> {
        window.disable();
        self.update_window(&window).await?;
        Ok(window)
    }

    async fn update_window(&self, window: &PermissionWindow) -> AppResult<()> {
        let mut windows = self.windows.lock().await;
        let Some(stored) = windows.iter_mut().find(|stored| stored.id() == window.id()) else {
            return Err(AppError::NotFound(format!(
                "permission window '{}'",
                window.id()
            )));
        };
        *stored = window.clone();
        Ok(())
    }

    async fn disable_windows(&self, filter: PermissionWindowFilter) -> AppResult<u64> {
        let now = Utc::now();
        let mut disabled = 0;
        for window in self.windows.lock().await.iter_mut() {
            let user_matches = filter.user_id.is_none_or(|user_id| window.user_id() == user_id);
            let state_matches = !filter.active_only || window.is_active_at(now);
            if user_matches && state_matches && window.is_enabled() {
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
        let users = self.users.lock().await;
        Ok(self
            .windows
            .lock()
            .await
            .iter()
            .filter(|window| query.user_id.is_none_or(|user_id| window.user_id() == user_id))
            .filter_map(|window| {
                users.get(&window.user_id()).map(|user| PermissionWindowListEntry {
                    window: window.clone(),
                    user: user.clone(),
                })
            })
            .skip(query.offset)
            .take(query.limit)
            .collect())
    }

    async fn list_impersonable_users(&self) -> AppResult<Vec<UserSummary>> {
        let now = Utc::now();
        let windows = self.windows.lock().await;
        let users = self.users.lock().await;
        let mut result: Vec<UserSummary> = users
            .values()
            .filter(|user| {
                windows
                    .iter()
                    .any(|window| window.user_id() == user.user_id && window.is_active_at(now))
            })
            .cloned()
            .collect();
        result.sort_by(|left, right| {
            (left.first_name.as_str(), left.last_name.as_str())
                .cmp(&(right.first_name.as_str(), right.last_name.as_str()))
        });
        Ok(result)
    }
}

#[derive(Default)]
pub(crate) struct FakeImpersonationSessionRepository {
    pub(crate) sessions: Mutex<Vec<OpenImpersonationSession>>,
}

#[async_trait]
impl ImpersonationSessionRepository for FakeImpersonationSessionRepository {
    async fn list_open_sessions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<OpenImpersonationSession>> {
        Ok(self
            .sessions
            .lock()
            .await
            .iter()
            .filter(|session| session.impersonating_user_id == user_id)
            .cloned()
            .collect())
    }
}

pub(crate) fn identity(username: &str, is_staff: bool) -> UserIdentity {
    UserIdentity::new(UserId::new(), username, username, None, is_staff)
}
