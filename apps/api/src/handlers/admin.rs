use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use impersonate_application::{
    PermissionWindowFilter, PermissionWindowListQuery, UpdatePermissionWindowInput,
};
use impersonate_core::UserIdentity;
use impersonate_domain::PermissionWindowId;

use crate::dto::{
    AdminPermissionWindowEntryResponse, AdminPermissionWindowListQuery,
    BulkDisablePermissionWindowsRequest, DisabledCountResponse, PermissionWindowResponse,
    UpdatePermissionWindowRequest, parse_optional_timestamp, parse_optional_user_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permission_windows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Query(query): Query<AdminPermissionWindowListQuery>,
) -> ApiResult<Json<Vec<AdminPermissionWindowEntryResponse>>> {
    let defaults = PermissionWindowListQuery::default();
    let query = PermissionWindowListQuery {
        search: query.search,
        user_id: parse_optional_user_id(query.user_id.as_deref())?,
        limit: query.limit.unwrap_or(defaults.limit),
        offset: query.offset.unwrap_or(defaults.offset),
    };

    let entries = state
        .permission_window_service
        .admin_list_windows(&user, query)
        .await?
        .into_iter()
        .map(AdminPermissionWindowEntryResponse::from)
        .collect();

    Ok(Json(entries))
}

pub async fn permission_window_detail_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(window_id): Path<String>,
) -> ApiResult<Json<PermissionWindowResponse>> {
    let window_id = PermissionWindowId::parse(window_id.as_str())?;
    let window = state
        .permission_window_service
        .admin_window_detail(&user, window_id)
        .await?;

    Ok(Json(PermissionWindowResponse::from(window)))
}

pub async fn update_permission_window_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(window_id): Path<String>,
    Json(payload): Json<UpdatePermissionWindowRequest>,
) -> ApiResult<Json<PermissionWindowResponse>> {
    let window_id = PermissionWindowId::parse(window_id.as_str())?;
    let input = UpdatePermissionWindowInput {
        window_starts_at: parse_optional_timestamp(
            "window_starts_at",
            payload.window_starts_at.as_deref(),
        )?,
        window_ends_at: parse_optional_timestamp(
            "window_ends_at",
            payload.window_ends_at.as_deref(),
        )?,
        is_enabled: payload.is_enabled,
    };

    let window = state
        .permission_window_service
        .admin_update_window(&user, window_id, input)
        .await?;

    Ok(Json(PermissionWindowResponse::from(window)))
}

pub async fn disable_permission_windows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<BulkDisablePermissionWindowsRequest>,
) -> ApiResult<Json<DisabledCountResponse>> {
    let filter = PermissionWindowFilter {
        user_id: parse_optional_user_id(payload.user_id.as_deref())?,
        active_only: payload.active_only,
    };

    let disabled = state
        .permission_window_service
        .admin_disable_windows(&user, filter)
        .await?;

    Ok(Json(DisabledCountResponse { disabled }))
}
