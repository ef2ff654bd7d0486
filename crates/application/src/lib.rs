//! Application services and ports.

#![forbid(unsafe_code)]

mod impersonation_alert_service;
mod permission_window_ports;
mod permission_window_service;
mod request_context;
mod settings;
mod window_enforcement_service;

#[cfg(test)]
mod test_support;

pub use impersonation_alert_service::ImpersonationAlertService;
pub use permission_window_ports::{
    CreatePermissionWindowInput, ImpersonationSessionRepository, OpenImpersonationSession,
    PermissionWindowFilter, PermissionWindowListEntry, PermissionWindowListQuery,
    PermissionWindowRepository, UpdatePermissionWindowInput, UserSummary,
};
pub use permission_window_service::PermissionWindowService;
pub use request_context::{ImpersonationTemplateContext, RequestContext};
pub use settings::{
    DEFAULT_EXPIRY_KEY, DISPLAY_MESSAGES_KEY, PermissionWindowSettings, STOP_PATH_KEY,
    WARNING_INTERVAL_KEY,
};
pub use window_enforcement_service::{
    EnforcementOutcome, WindowEnforcementService, message_level_for,
};
