use impersonate_application::{ImpersonationTemplateContext, UserSummary};
use impersonate_domain::FlashMessage;
use serde::Serialize;
use ts_rs::TS;

use super::common::UserIdentityResponse;

/// User offered to staff by the impersonation picker.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/impersonable-user-response.ts"
)]
pub struct ImpersonableUserResponse {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
}

impl From<UserSummary> for ImpersonableUserResponse {
    fn from(user: UserSummary) -> Self {
        Self {
            display_name: user.display_name(),
            user_id: user.user_id.to_string(),
            username: user.username,
            email: user.email,
        }
    }
}

/// Impersonation state exposed to views.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/impersonation-context-response.ts"
)]
pub struct ImpersonationContextResponse {
    pub is_impersonating: bool,
    pub impersonator: Option<UserIdentityResponse>,
    pub impersonating_user: Option<UserIdentityResponse>,
}

impl From<ImpersonationTemplateContext> for ImpersonationContextResponse {
    fn from(context: ImpersonationTemplateContext) -> Self {
        Self {
            is_impersonating: context.is_impersonating,
            impersonator: context.impersonator.map(UserIdentityResponse::from),
            impersonating_user: context.impersonating_user.map(UserIdentityResponse::from),
        }
    }
}

/// Queued user-facing message.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/flash-message-response.ts"
)]
pub struct FlashMessageResponse {
    pub level: String,
    pub text: String,
}

impl From<FlashMessage> for FlashMessageResponse {
    fn from(message: FlashMessage) -> Self {
        Self {
            level: message.level.as_str().to_owned(),
            text: message.text,
        }
    }
}
