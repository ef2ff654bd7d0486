use impersonate_application::{
    ImpersonationAlertService, PermissionWindowService, WindowEnforcementService,
};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permission_window_service: PermissionWindowService,
    pub window_enforcement_service: WindowEnforcementService,
    pub impersonation_alert_service: ImpersonationAlertService,
    pub postgres_pool: PgPool,
}
