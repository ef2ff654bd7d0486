//! Permission window use-cases.
//!
//! End users grant and revoke permission for their own account; staff may act
//! on any account and use the administrative surface in `admin`.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use impersonate_core::{AppError, AppResult, UserId, UserIdentity};
use impersonate_domain::{PermissionWindow, PermissionWindowId};

use crate::permission_window_ports::{
    CreatePermissionWindowInput, PermissionWindowFilter, PermissionWindowRepository, UserSummary,
};
use crate::settings::PermissionWindowSettings;

mod admin;


/// Application service for permission window workflows.
#[derive(Clone)]
pub struct PermissionWindowService {
    repository: Arc<dyn PermissionWindowRepository>,
    settings: PermissionWindowSettings,
}

impl PermissionWindowService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        repository: Arc<dyn PermissionWindowRepository>,
        settings: PermissionWindowSettings,
    ) -> Self {
        Self {
            repository,
            settings,
        }
    }

    /// Returns the settings the service was built with.
    #[must_use]
    pub fn settings(&self) -> &PermissionWindowSettings {
        &self.settings
    }

    /// Creates a window, disabling the owner's previously active windows.
    ///
    /// Users may only grant permission on their own account; staff may grant
    /// on behalf of anyone.
    pub async fn grant_window(
        &self,
        actor: &UserIdentity,
        input: CreatePermissionWindowInput,
    ) -> AppResult<PermissionWindow> {
        require_owner_or_staff(actor, input.user_id)?;
        self.create_window(input).await
    }

    /// Creates a window without an actor check. Used by trusted callers.
    pub async fn create_window(
        &self,
        input: CreatePermissionWindowInput,
    ) -> AppResult<PermissionWindow> {
        let window = input.into_window(Utc::now(), self.settings.default_expiry());
        let window = self.repository.create_window(window).await?;

        info!(
            window_id = %window.id(),
            user_id = %window.user_id(),
            ends_at = %window.window_ends_at(),
            "permission window created"
        );

        Ok(window)
    }

    /// Disables every active window on the actor's own account.
    pub async fn revoke_own_windows(&self, actor: &UserIdentity) -> AppResult<u64> {
        let disabled = self
            .repository
            .disable_windows(PermissionWindowFilter::active_for_user(actor.user_id()))
            .await?;

        info!(user_id = %actor.user_id(), disabled, "permission windows revoked");
        Ok(disabled)
    }

    /// Lists a user's active windows ordered by start, then end.
    pub async fn active_windows_for(&self, user_id: UserId) -> AppResult<Vec<PermissionWindow>> {
        self.repository.list_active_windows(user_id).await
    }

    /// Returns the most recently started active window for a user.
    pub async fn latest_active_window(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<PermissionWindow>> {
        Ok(self.repository.list_active_windows(user_id).await?.pop())
    }

    /// Disables a single window. Owners and staff only.
    pub async fn disable_window(
        &self,
        actor: &UserIdentity,
        window_id: PermissionWindowId,
    ) -> AppResult<PermissionWindow> {
        let window = self.require_window(window_id).await?;
        require_owner_or_staff(actor, window.user_id())?;

        let window = self.repository.disable_window(window).await?;
        info!(
            window_id = %window.id(),
            user_id = %window.user_id(),
            actor = %actor.user_id(),
            "permission window disabled"
        );

        Ok(window)
    }

    /// Lists users that currently allow impersonation.
    pub async fn impersonable_users(&self) -> AppResult<Vec<UserSummary>> {
        self.repository.list_impersonable_users().await
    }

    async fn require_window(&self, window_id: PermissionWindowId) -> AppResult<PermissionWindow> {
        self.repository
            .find_window(window_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("permission window '{window_id}'")))
    }
}

fn require_owner_or_staff(actor: &UserIdentity, user_id: UserId) -> AppResult<()> {
    if actor.is_staff() || actor.user_id() == user_id {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "permission windows can only be managed by their owner or staff".to_owned(),
    ))
}

fn require_staff(actor: &UserIdentity) -> AppResult<()> {
    if actor.is_staff() {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "permission window administration requires staff access".to_owned(),
    ))
}
