//! PostgreSQL-backed permission window repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use impersonate_application::{
    PermissionWindowFilter, PermissionWindowListEntry, PermissionWindowListQuery,
    PermissionWindowRepository, UserSummary,
};
use impersonate_core::{AppError, AppResult, UserId};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

mod admin;
mod windows;


/// Largest page the admin listing returns.
const MAX_LIST_LIMIT: usize = 200;
/// Deepest offset the admin listing accepts.
const MAX_LIST_OFFSET: usize = 5_000;

/// PostgreSQL implementation of the permission window repository port.
#[derive(Clone)]
pub struct PostgresPermissionWindowRepository {
    pool: PgPool,
}

impl PostgresPermissionWindowRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PermissionWindowRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    window_starts_at: DateTime<Utc>,
    window_ends_at: DateTime<Utc>,
    is_enabled: bool,
    created_at: DateTime<Utc>,
}

impl From<PermissionWindowRow> for PermissionWindow {
    fn from(row: PermissionWindowRow) -> Self {
        PermissionWindow::new(
            PermissionWindowId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.window_starts_at,
            row.window_ends_at,
            row.is_enabled,
            row.created_at,
        )
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserSummaryRow {
    id: uuid::Uuid,
    username: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
}

impl From<UserSummaryRow> for UserSummary {
    fn from(row: UserSummaryRow) -> Self {
        Self {
            user_id: UserId::from_uuid(row.id),
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
        }
    }
}

#[async_trait]
impl PermissionWindowRepository for PostgresPermissionWindowRepository {
    async fn create_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow> {
        self.create_window_impl(window).await
    }

    async fn list_active_windows(&self, user_id: UserId) -> AppResult<Vec<PermissionWindow>> {
        self.list_active_windows_impl(user_id).await
    }

    async fn find_window(
        &self,
        window_id: PermissionWindowId,
    ) -> AppResult<Option<PermissionWindow>> {
        self.find_window_impl(window_id).await
    }

    async fn disable_window(&self, window: PermissionWindow) -> AppResult<PermissionWindow> {
        self.disable_window_impl(window).await
    }

    async fn update_window(&self, window: &PermissionWindow) -> AppResult<()> {
        self.update_window_impl(window).await
    }

    async fn disable_windows(&self, filter: PermissionWindowFilter) -> AppResult<u64> {
        self.disable_windows_impl(filter).await
    }

    async fn list_windows(
        &self,
        query: PermissionWindowListQuery,
    ) -> AppResult<Vec<PermissionWindowListEntry>> {
        self.list_windows_impl(query).await
    }

    async fn list_impersonable_users(&self) -> AppResult<Vec<UserSummary>> {
        self.list_impersonable_users_impl().await
    }
}

fn window_not_found(window_id: PermissionWindowId) -> AppError {
    AppError::NotFound(format!("permission window '{window_id}'"))
}
