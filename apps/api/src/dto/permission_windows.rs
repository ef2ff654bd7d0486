use chrono::Utc;
use impersonate_domain::PermissionWindow;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::common::format_timestamp;

/// Incoming payload for granting a permission window.
///
/// Every field is optional: the window defaults to the caller's own account,
/// starting now and lasting the configured default expiry.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-permission-window-request.ts"
)]
pub struct CreatePermissionWindowRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub window_starts_at: Option<String>,
    #[serde(default)]
    pub window_ends_at: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

/// API representation of a permission window.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-window-response.ts"
)]
pub struct PermissionWindowResponse {
    pub window_id: String,
    pub user_id: String,
    pub window_starts_at: String,
    pub window_ends_at: String,
    pub is_enabled: bool,
    pub is_active: bool,
    pub ttl_seconds: i64,
    pub created_at: String,
}

impl From<PermissionWindow> for PermissionWindowResponse {
    fn from(window: PermissionWindow) -> Self {
        let now = Utc::now();
        Self {
            window_id: window.id().to_string(),
            user_id: window.user_id().to_string(),
            window_starts_at: format_timestamp(window.window_starts_at()),
            window_ends_at: format_timestamp(window.window_ends_at()),
            is_enabled: window.is_enabled(),
            is_active: window.is_active_at(now),
            ttl_seconds: window.ttl_at(now).num_seconds(),
            created_at: format_timestamp(window.created_at()),
        }
    }
}
