use super::*;

impl PostgresPermissionWindowRepository {
    pub(super) async fn create_window_impl(
        &self,
        window: PermissionWindow,
    ) -> AppResult<PermissionWindow> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        // Row lock on the owner serializes concurrent creates for one user.
        let owner = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(window.user_id().as_uuid())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to lock permission window owner: {error}"))
        })?;

        if owner.is_none() {
            return Err(AppError::NotFound(format!("user '{}'", window.user_id())));
        }

        let superseded = sqlx::query(
            r#"
            UPDATE impersonate_permission_windows
            SET is_enabled = FALSE
            WHERE user_id = $1
              AND is_enabled
              AND window_starts_at < now()
              AND window_ends_at > now()
            "#,
        )
        .bind(window.user_id().as_uuid())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to disable previous permission windows: {error}"
            ))
        })?;
        debug!(
            user_id = %window.user_id(),
            superseded = superseded.rows_affected(),
            "disabled previously active permission windows"
        );

        let row = sqlx::query_as::<_, PermissionWindowRow>(
            r#"
            INSERT INTO impersonate_permission_windows (
                id,
                user_id,
                window_starts_at,
                window_ends_at,
                is_enabled,
                created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, window_starts_at, window_ends_at, is_enabled, created_at
            "#,
        )
        .bind(window.id().as_uuid())
        .bind(window.user_id().as_uuid())
        .bind(window.window_starts_at())
        .bind(window.window_ends_at())
        .bind(window.is_enabled())
        .bind(window.created_at())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to create permission window: {error}"))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(PermissionWindow::from(row))
    }

    pub(super) async fn list_active_windows_impl(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<PermissionWindow>> {
        let rows = sqlx::query_as::<_, PermissionWindowRow>(
            r#"
            SELECT id, user_id, window_starts_at, window_ends_at, is_enabled, created_at
            FROM impersonate_permission_windows
            WHERE user_id = $1
              AND is_enabled
              AND window_starts_at < now()
              AND window_ends_at > now()
            ORDER BY window_starts_at ASC, window_ends_at ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list active permission windows: {error}"))
        })?;

        Ok(rows.into_iter().map(PermissionWindow::from).collect())
    }

    pub(super) async fn find_window_impl(
        &self,
        window_id: PermissionWindowId,
    ) -> AppResult<Option<PermissionWindow>> {
        let row = sqlx::query_as::<_, PermissionWindowRow>(
            r#"
            SELECT id, user_id, window_starts_at, window_ends_at, is_enabled, created_at
            FROM impersonate_permission_windows
            WHERE id = $1
            "#,
        )
        .bind(window_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission window: {error}"))
        })?;

        Ok(row.map(PermissionWindow::from))
    }

    pub(super) async fn disable_window_impl(
        &self,
        mut window: PermissionWindow,
    ) -> AppResult<PermissionWindow> {
        let result = sqlx::query(
            r#"
            UPDATE impersonate_permission_windows
            SET is_enabled = FALSE
            WHERE id = $1
            "#,
        )
        .bind(window.id().as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to disable permission window: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(window_not_found(window.id()));
        }

        window.disable();
        Ok(window)
    }

    pub(super) async fn update_window_impl(&self, window: &PermissionWindow) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE impersonate_permission_windows
            SET window_starts_at = $2,
                window_ends_at = $3,
                is_enabled = $4
            WHERE id = $1
            "#,
        )
        .bind(window.id().as_uuid())
        .bind(window.window_starts_at())
        .bind(window.window_ends_at())
        .bind(window.is_enabled())
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update permission window: {error}"))
        })?;

        if result.rows_affected() == 0 {
            return Err(window_not_found(window.id()));
        }

        Ok(())
    }

    pub(super) async fn disable_windows_impl(
        &self,
        filter: PermissionWindowFilter,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE impersonate_permission_windows
            SET is_enabled = FALSE
            WHERE is_enabled
              AND ($1::UUID IS NULL OR user_id = $1)
              AND (
                  NOT $2::BOOLEAN
                  OR (window_starts_at < now() AND window_ends_at > now())
              )
            "#,
        )
        .bind(filter.user_id.map(|user_id| user_id.as_uuid()))
        .bind(filter.active_only)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to disable permission windows: {error}"))
        })?;

        Ok(result.rows_affected())
    }
}
