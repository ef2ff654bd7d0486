//! Request pipeline: authentication, impersonation context, account alerts
//! and permission window enforcement, in that order.

use axum::extract::{Extension, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use impersonate_application::{EnforcementOutcome, RequestContext};
use impersonate_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::debug;

use crate::error::ApiResult;
use crate::flash::FlashMessages;
use crate::state::AppState;


/// Session key holding the authenticated, or impersonated, user.
pub const SESSION_USER_KEY: &str = "user_identity";
/// Session key holding the staff member while impersonating.
pub const SESSION_IMPERSONATOR_KEY: &str = "impersonator_identity";

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Builds the explicit request context and the flash message buffer.
///
/// The impersonation decision itself belongs to the external system; this
/// only reads what it stored in the session.
pub async fn resolve_request_context(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let user = request.extensions().get::<UserIdentity>().cloned();
    let impersonator = session
        .get::<UserIdentity>(SESSION_IMPERSONATOR_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session impersonator: {error}"))
        })?;
    let path = request.uri().path().to_owned();

    let context = match (user, impersonator) {
        (Some(user), Some(impersonator)) => {
            RequestContext::impersonating(user, impersonator, path)
        }
        (Some(user), None) => RequestContext::authenticated(user, path),
        (None, _) => RequestContext::anonymous(path),
    };

    let flash = FlashMessages::load(&session).await?;
    request.extensions_mut().insert(context);
    request.extensions_mut().insert(flash.clone());

    let response = next.run(request).await;
    flash.persist(&session).await?;

    Ok(response)
}

pub async fn alert_impersonated_user(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Extension(flash): Extension<FlashMessages>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let alerts = state
        .impersonation_alert_service
        .alerts_for(&context)
        .await?;
    for alert in alerts {
        flash.push(alert).await;
    }

    Ok(next.run(request).await)
}

pub async fn enforce_permission_window(
    State(state): State<AppState>,
    Extension(context): Extension<RequestContext>,
    Extension(flash): Extension<FlashMessages>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    match state.window_enforcement_service.check(&context).await? {
        EnforcementOutcome::Continue { message } => {
            if let Some(message) = message {
                flash.push(message).await;
            }

            Ok(next.run(request).await)
        }
        EnforcementOutcome::Redirect { location, message } => {
            if let Some(message) = message {
                flash.push(message).await;
            }

            debug!(path = context.path(), %location, "redirecting to stop impersonation");
            Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
        }
    }
}
