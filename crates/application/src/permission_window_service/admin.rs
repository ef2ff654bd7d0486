use super::*;

use crate::permission_window_ports::{
    PermissionWindowListEntry, PermissionWindowListQuery, UpdatePermissionWindowInput,
};

impl PermissionWindowService {
    /// Lists and searches windows with their owners.
    pub async fn admin_list_windows(
        &self,
        actor: &UserIdentity,
        query: PermissionWindowListQuery,
    ) -> AppResult<Vec<PermissionWindowListEntry>> {
        require_staff(actor)?;
        self.repository.list_windows(query).await
    }

    /// Returns one window.
    pub async fn admin_window_detail(
        &self,
        actor: &UserIdentity,
        window_id: PermissionWindowId,
    ) -> AppResult<PermissionWindow> {
        require_staff(actor)?;
        self.require_window(window_id).await
    }

    /// Edits start, end and kill switch. `created_at` stays read-only.
    pub async fn admin_update_window(
        &self,
        actor: &UserIdentity,
        window_id: PermissionWindowId,
        input: UpdatePermissionWindowInput,
    ) -> AppResult<PermissionWindow> {
        require_staff(actor)?;

        let mut window = self.require_window(window_id).await?;
        window.apply_changes(
            input.window_starts_at,
            input.window_ends_at,
            input.is_enabled,
        );
        self.repository.update_window(&window).await?;

        info!(
            window_id = %window.id(),
            user_id = %window.user_id(),
            actor = %actor.user_id(),
            "permission window updated"
        );

        Ok(window)
    }

    /// Users currently allowing impersonation, for the staff-side picker.
    pub async fn list_impersonable_users(
        &self,
        actor: &UserIdentity,
    ) -> AppResult<Vec<UserSummary>> {
        require_staff(actor)?;
        self.impersonable_users().await
    }

    /// Bulk-disables windows matching `filter`.
    pub async fn admin_disable_windows(
        &self,
        actor: &UserIdentity,
        filter: PermissionWindowFilter,
    ) -> AppResult<u64> {
        require_staff(actor)?;

        let disabled = self.repository.disable_windows(filter).await?;
        info!(actor = %actor.user_id(), disabled, "permission windows bulk disabled");

        Ok(disabled)
    }
}
