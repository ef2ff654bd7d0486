use super::*;

#[derive(Debug, sqlx::FromRow)]
struct PermissionWindowListRow {
    id: uuid::Uuid,
    user_id: uuid::Uuid,
    window_starts_at: DateTime<Utc>,
    window_ends_at: DateTime<Utc>,
    is_enabled: bool,
    created_at: DateTime<Utc>,
    username: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
}

impl From<PermissionWindowListRow> for PermissionWindowListEntry {
    fn from(row: PermissionWindowListRow) -> Self {
        Self {
            window: PermissionWindow::new(
                PermissionWindowId::from_uuid(row.id),
                UserId::from_uuid(row.user_id),
                row.window_starts_at,
                row.window_ends_at,
                row.is_enabled,
                row.created_at,
            ),
            user: UserSummary {
                user_id: UserId::from_uuid(row.user_id),
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
        }
    }
}

impl PostgresPermissionWindowRepository {
    pub(super) async fn list_windows_impl(
        &self,
        query: PermissionWindowListQuery,
    ) -> AppResult<Vec<PermissionWindowListEntry>> {
        let limit = i64::try_from(query.limit.clamp(1, MAX_LIST_LIMIT)).map_err(|_| {
            AppError::Validation("permission window list limit is out of range".to_owned())
        })?;
        let offset = i64::try_from(query.offset.min(MAX_LIST_OFFSET)).map_err(|_| {
            AppError::Validation("permission window list offset is out of range".to_owned())
        })?;
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(contains_pattern);

        let rows = sqlx::query_as::<_, PermissionWindowListRow>(
            r#"
            SELECT
                windows.id,
                windows.user_id,
                windows.window_starts_at,
                windows.window_ends_at,
                windows.is_enabled,
                windows.created_at,
                users.username,
                users.first_name,
                users.last_name,
                users.email
            FROM impersonate_permission_windows windows
            INNER JOIN users ON users.id = windows.user_id
            WHERE ($1::UUID IS NULL OR windows.user_id = $1)
              AND (
                  $2::TEXT IS NULL
                  OR users.first_name ILIKE $2
                  OR users.last_name ILIKE $2
                  OR users.email ILIKE $2
                  OR users.username ILIKE $2
              )
            ORDER BY windows.created_at DESC
            LIMIT $3
            OFFSET $4
            "#,
        )
        .bind(query.user_id.map(|user_id| user_id.as_uuid()))
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list permission windows: {error}"))
        })?;

        Ok(rows.into_iter().map(PermissionWindowListEntry::from).collect())
    }

    pub(super) async fn list_impersonable_users_impl(&self) -> AppResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT DISTINCT users.id, users.username, users.first_name, users.last_name, users.email
            FROM users
            INNER JOIN impersonate_permission_windows windows ON windows.user_id = users.id
            WHERE windows.is_enabled
              AND windows.window_starts_at < now()
              AND windows.window_ends_at > now()
            ORDER BY users.first_name ASC, users.last_name ASC, users.username ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list impersonable users: {error}"))
        })?;

        Ok(rows.into_iter().map(UserSummary::from).collect())
    }
}

/// Builds an `ILIKE` pattern matching `value` literally anywhere in a column.
pub(super) fn contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for character in value.chars() {
        if matches!(character, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(character);
    }
    pattern.push('%');
    pattern
}
