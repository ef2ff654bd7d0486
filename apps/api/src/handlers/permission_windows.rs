use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use impersonate_application::CreatePermissionWindowInput;
use impersonate_core::UserIdentity;
use impersonate_domain::PermissionWindowId;

use crate::dto::{
    CreatePermissionWindowRequest, DisabledCountResponse, PermissionWindowResponse,
    parse_optional_timestamp, parse_optional_user_id,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_permission_windows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<PermissionWindowResponse>>> {
    let windows = state
        .permission_window_service
        .active_windows_for(user.user_id())
        .await?
        .into_iter()
        .map(PermissionWindowResponse::from)
        .collect();

    Ok(Json(windows))
}

pub async fn create_permission_window_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Json(payload): Json<CreatePermissionWindowRequest>,
) -> ApiResult<(StatusCode, Json<PermissionWindowResponse>)> {
    let input = CreatePermissionWindowInput {
        user_id: parse_optional_user_id(payload.user_id.as_deref())?.unwrap_or(user.user_id()),
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
        .grant_window(&user, input)
        .await?;

    Ok((StatusCode::CREATED, Json(PermissionWindowResponse::from(window))))
}

pub async fn revoke_permission_windows_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<DisabledCountResponse>> {
    let disabled = state
        .permission_window_service
        .revoke_own_windows(&user)
        .await?;

    Ok(Json(DisabledCountResponse { disabled }))
}

pub async fn disable_permission_window_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
    Path(window_id): Path<String>,
) -> ApiResult<Json<PermissionWindowResponse>> {
    let window_id = PermissionWindowId::parse(window_id.as_str())?;
    let window = state
        .permission_window_service
        .disable_window(&user, window_id)
        .await?;

    Ok(Json(PermissionWindowResponse::from(window)))
}
