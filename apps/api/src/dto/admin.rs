use impersonate_application::PermissionWindowListEntry;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::permission_windows::PermissionWindowResponse;

/// Query string of the administrative window listing.
#[derive(Debug, Default, Deserialize)]
pub struct AdminPermissionWindowListQuery {
    pub search: Option<String>,
    pub user_id: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Administrative listing row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/admin-permission-window-entry-response.ts"
)]
pub struct AdminPermissionWindowEntryResponse {
    pub username: String,
    pub user_display_name: String,
    pub user_email: Option<String>,
    pub window: PermissionWindowResponse,
}

impl From<PermissionWindowListEntry> for AdminPermissionWindowEntryResponse {
    fn from(entry: PermissionWindowListEntry) -> Self {
        Self {
            user_display_name: entry.user.display_name(),
            username: entry.user.username,
            user_email: entry.user.email,
            window: PermissionWindowResponse::from(entry.window),
        }
    }
}

/// Incoming payload for an administrative edit. `created_at` is read-only.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-permission-window-request.ts"
)]
pub struct UpdatePermissionWindowRequest {
    #[serde(default)]
    pub window_starts_at: Option<String>,
    #[serde(default)]
    pub window_ends_at: Option<String>,
    #[serde(default)]
    pub is_enabled: Option<bool>,
}

/// Incoming payload for the bulk "disable selected" action.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-disable-permission-windows-request.ts"
)]
pub struct BulkDisablePermissionWindowsRequest {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub active_only: bool,
}
