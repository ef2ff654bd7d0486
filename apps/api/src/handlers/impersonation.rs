use axum::Json;
use axum::extract::{Extension, State};
use impersonate_application::{ImpersonationTemplateContext, RequestContext};
use impersonate_core::UserIdentity;

use crate::dto::{ImpersonableUserResponse, ImpersonationContextResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// Users currently allowing impersonation, for the external picker.
pub async fn list_impersonable_users_handler(
    State(state): State<AppState>,
    Extension(user): Extension<UserIdentity>,
) -> ApiResult<Json<Vec<ImpersonableUserResponse>>> {
    let users = state
        .permission_window_service
        .list_impersonable_users(&user)
        .await?
        .into_iter()
        .map(ImpersonableUserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn impersonation_context_handler(
    Extension(context): Extension<RequestContext>,
) -> Json<ImpersonationContextResponse> {
    Json(ImpersonationContextResponse::from(
        ImpersonationTemplateContext::from_request(&context),
    ))
}
