use std::sync::Arc;

use impersonate_application::{
    ImpersonationAlertService, ImpersonationSessionRepository, PermissionWindowRepository,
    PermissionWindowService, PermissionWindowSettings, WindowEnforcementService,
};
use impersonate_infrastructure::{
    PostgresImpersonationSessionRepository, PostgresPermissionWindowRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let window_repository = Arc::new(PostgresPermissionWindowRepository::new(pool.clone()));
    let session_repository = Arc::new(PostgresImpersonationSessionRepository::new(pool.clone()));

    assemble_app_state(
        pool,
        window_repository,
        session_repository,
        config.permission_windows.clone(),
    )
}

/// Wires services over the given ports.
pub(crate) fn assemble_app_state(
    pool: PgPool,
    window_repository: Arc<dyn PermissionWindowRepository>,
    session_repository: Arc<dyn ImpersonationSessionRepository>,
    settings: PermissionWindowSettings,
) -> AppState {
    let permission_window_service = PermissionWindowService::new(window_repository, settings);
    let window_enforcement_service =
        WindowEnforcementService::new(permission_window_service.clone());
    let impersonation_alert_service = ImpersonationAlertService::new(
        session_repository,
        permission_window_service.settings().clone(),
    );

    AppState {
        permission_window_service,
        window_enforcement_service,
        impersonation_alert_service,
        postgres_pool: pool,
    }
}
