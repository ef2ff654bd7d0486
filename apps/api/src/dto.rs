mod admin;
mod common;
mod impersonation;
mod permission_windows;

pub use admin::{
    AdminPermissionWindowEntryResponse, AdminPermissionWindowListQuery,
    BulkDisablePermissionWindowsRequest, UpdatePermissionWindowRequest,
};
pub use common::{
    DisabledCountResponse, HealthDependencyStatus, HealthResponse, UserIdentityResponse,
    parse_optional_timestamp, parse_optional_user_id,
};
pub use impersonation::{
    FlashMessageResponse, ImpersonableUserResponse, ImpersonationContextResponse,
};
pub use permission_windows::{CreatePermissionWindowRequest, PermissionWindowResponse};

#[cfg(test)]
mod tests {
    use super::{
        AdminPermissionWindowEntryResponse, BulkDisablePermissionWindowsRequest,
        CreatePermissionWindowRequest, DisabledCountResponse, FlashMessageResponse,
        HealthDependencyStatus, HealthResponse, ImpersonableUserResponse,
        ImpersonationContextResponse, PermissionWindowResponse, UpdatePermissionWindowRequest,
        UserIdentityResponse,
    };

    use crate::error::ErrorResponse;
    use ts_rs::Config;
    use ts_rs::TS;

    #[test]
    fn export_ts_bindings() -> Result<(), ts_rs::ExportError> {
        let config = Config::default();

        CreatePermissionWindowRequest::export(&config)?;
        PermissionWindowResponse::export(&config)?;
        DisabledCountResponse::export(&config)?;
        ImpersonableUserResponse::export(&config)?;
        ImpersonationContextResponse::export(&config)?;
        UserIdentityResponse::export(&config)?;
        FlashMessageResponse::export(&config)?;
        AdminPermissionWindowEntryResponse::export(&config)?;
        UpdatePermissionWindowRequest::export(&config)?;
        BulkDisablePermissionWindowsRequest::export(&config)?;
        HealthDependencyStatus::export(&config)?;
        HealthResponse::export(&config)?;
        ErrorResponse::export(&config)?;

        Ok(())
    }
}
