use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use impersonate_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;

use cors::build_cors_layer;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    Ok(build_routes(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .layer(session_layer))
}

/// Routes and the request pipeline, without transport layers.
///
/// Route layers run outermost-last: authentication, then the request context,
/// then account alerts, then window enforcement.
pub fn build_routes(app_state: AppState) -> Router {
    let protected_routes = Router::new()
        .route(
            "/api/permission-windows",
            get(handlers::permission_windows::list_permission_windows_handler)
                .post(handlers::permission_windows::create_permission_window_handler)
                .delete(handlers::permission_windows::revoke_permission_windows_handler),
        )
        .route(
            "/api/permission-windows/{window_id}/disable",
            post(handlers::permission_windows::disable_permission_window_handler),
        )
        .route(
            "/api/impersonation/users",
            get(handlers::impersonation::list_impersonable_users_handler),
        )
        .route(
            "/api/impersonation/context",
            get(handlers::impersonation::impersonation_context_handler),
        )
        .route(
            "/api/messages",
            get(handlers::messages::drain_messages_handler),
        )
        .route(
            "/api/admin/permission-windows",
            get(handlers::admin::list_permission_windows_handler),
        )
        .route(
            "/api/admin/permission-windows/disable",
            post(handlers::admin::disable_permission_windows_handler),
        )
        .route(
            "/api/admin/permission-windows/{window_id}",
            get(handlers::admin::permission_window_detail_handler)
                .put(handlers::admin::update_permission_window_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::enforce_permission_window,
        ))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::alert_impersonated_user,
        ))
        .route_layer(from_fn(middleware::resolve_request_context))
        .route_layer(from_fn(middleware::require_auth));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .with_state(app_state)
}
