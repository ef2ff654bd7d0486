//! Per-request permission window enforcement.
//!
//! Runs after the impersonation system has decided whether the request is
//! impersonated. Expiry is evaluated lazily here; nothing runs in the
//! background.

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use impersonate_core::{AppError, AppResult};
use impersonate_domain::{
    FlashMessage, MessageLevel, MessageSubject, WindowMessageKind, format_window_message,
};

use crate::permission_window_service::PermissionWindowService;
use crate::request_context::RequestContext;
use crate::settings::PermissionWindowSettings;

/// What the caller should do with the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnforcementOutcome {
    /// Hand the request to the next handler.
    Continue {
        /// Message to show, when messages are enabled.
        message: Option<FlashMessage>,
    },
    /// End impersonation by redirecting to the stop route.
    Redirect {
        /// Stop route.
        location: String,
        /// Message to show, when messages are enabled.
        message: Option<FlashMessage>,
    },
}

impl EnforcementOutcome {
    fn pass() -> Self {
        Self::Continue { message: None }
    }

    /// Returns the message attached to the outcome.
    #[must_use]
    pub fn message(&self) -> Option<&FlashMessage> {
        match self {
            Self::Continue { message } | Self::Redirect { message, .. } => message.as_ref(),
        }
    }
}

/// Application service deciding whether an impersonated request may proceed.
#[derive(Clone)]
pub struct WindowEnforcementService {
    windows: PermissionWindowService,
    settings: PermissionWindowSettings,
}

impl WindowEnforcementService {
    /// Creates a new service sharing the window service's settings.
    #[must_use]
    pub fn new(windows: PermissionWindowService) -> Self {
        let settings = windows.settings().clone();
        Self { windows, settings }
    }

    /// Checks one request.
    ///
    /// Fails with `AppError::Internal` when the request carries no
    /// authenticated user: the check was installed before authentication.
    pub async fn check(&self, context: &RequestContext) -> AppResult<EnforcementOutcome> {
        let Some(user) = context.user() else {
            return Err(AppError::Internal(
                "permission window enforcement ran without an authenticated user; \
                 it must be installed after authentication"
                    .to_owned(),
            ));
        };

        if !context.is_impersonating() {
            return Ok(EnforcementOutcome::pass());
        }

        if context.path() == self.settings.stop_path() {
            return Ok(EnforcementOutcome::pass());
        }

        let now = Utc::now();
        match self.windows.latest_active_window(user.user_id()).await? {
            Some(window) => {
                let level = message_level_for(window.ttl_at(now), self.settings.warning_interval());
                debug!(
                    window_id = %window.id(),
                    user_id = %user.user_id(),
                    ttl_seconds = window.ttl_at(now).num_seconds(),
                    "impersonation permitted"
                );

                let impersonating = user.to_string();
                let message = self.settings.display_messages().then(|| {
                    format_window_message(
                        WindowMessageKind::Impersonating,
                        level,
                        MessageSubject::Window {
                            window: &window,
                            impersonating: impersonating.as_str(),
                            now,
                        },
                    )
                });

                Ok(EnforcementOutcome::Continue { message })
            }
            None => {
                warn!(
                    user_id = %user.user_id(),
                    impersonator = ?context.impersonator().map(|identity| identity.user_id()),
                    "no active permission window; ending impersonation"
                );

                let message = self.settings.display_messages().then(|| {
                    format_window_message(
                        WindowMessageKind::Expired,
                        MessageLevel::Info,
                        MessageSubject::None,
                    )
                });

                Ok(EnforcementOutcome::Redirect {
                    location: self.settings.stop_path().to_owned(),
                    message,
                })
            }
        }
    }
}

/// Warning below the threshold, notice at or above it.
#[must_use]
pub fn message_level_for(ttl: Duration, warning_interval: Duration) -> MessageLevel {
    if ttl < warning_interval {
        MessageLevel::Warning
    } else {
        MessageLevel::Info
    }
}
