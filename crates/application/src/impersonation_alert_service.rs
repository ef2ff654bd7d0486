use std::sync::Arc;

use impersonate_core::AppResult;
use impersonate_domain::{
    FlashMessage, MessageLevel, MessageSubject, WindowMessageKind, format_window_message,
};

use crate::permission_window_ports::ImpersonationSessionRepository;
use crate::request_context::RequestContext;
use crate::settings::PermissionWindowSettings;

/// Tells account owners that staff currently hold an impersonation session
/// on their account.
#[derive(Clone)]
pub struct ImpersonationAlertService {
    sessions: Arc<dyn ImpersonationSessionRepository>,
    settings: PermissionWindowSettings,
}

impl ImpersonationAlertService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(
        sessions: Arc<dyn ImpersonationSessionRepository>,
        settings: PermissionWindowSettings,
    ) -> Self {
        Self { sessions, settings }
    }

    /// Returns one message per open session on the requesting user's account.
    ///
    /// Anonymous and impersonated requests get nothing.
    pub async fn alerts_for(&self, context: &RequestContext) -> AppResult<Vec<FlashMessage>> {
        if !self.settings.display_messages() || context.is_impersonating() {
            return Ok(Vec::new());
        }

        let Some(user) = context.user() else {
            return Ok(Vec::new());
        };

        let sessions = self.sessions.list_open_sessions(user.user_id()).await?;
        Ok(sessions
            .iter()
            .map(|session| {
                let impersonator = session.impersonator.display_name();
                format_window_message(
                    WindowMessageKind::Impersonated,
                    MessageLevel::Info,
                    MessageSubject::Impersonator(impersonator.as_str()),
                )
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, Utc};

    use impersonate_core::UserIdentity;
    use impersonate_domain::MessageLevel;

    use crate::permission_window_ports::{OpenImpersonationSession, UserSummary};
    use crate::request_context::RequestContext;
    use crate::settings::PermissionWindowSettings;
    use crate::test_support::{FakeImpersonationSessionRepository, identity};

    use super::ImpersonationAlertService;

    async fn service_with_session(
        user: &UserIdentity,
        settings: PermissionWindowSettings,
    ) -> ImpersonationAlertService {
        let repository = Arc::new(FakeImpersonationSessionRepository::default());
        repository.sessions.lock().await.push(OpenImpersonationSession {
            session_key: "session-1".to_owned(),
            impersonator: UserSummary {
                user_id: impersonate_core::UserId::new(),
                username: "admin".to_owned(),
                first_name: "Alice".to_owned(),
                last_name: "Admin".to_owned(),
                email: None,
            },
            impersonating_user_id: user.user_id(),
            session_started_at: Utc::now() - Duration::hours(1),
        });
        ImpersonationAlertService::new(repository, settings)
    }

    #[tokio::test]
    async fn open_session_produces_one_message() {
        let user = identity("max", false);
        let service = service_with_session(&user, PermissionWindowSettings::default()).await;

        let alerts = service
            .alerts_for(&RequestContext::authenticated(user, "/"))
            .await;

        let Ok(alerts) = alerts else {
            panic!("alerts should load");
        };
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, MessageLevel::Info);
        assert!(alerts[0].text.contains("Alice Admin"));
    }

    #[tokio::test]
    async fn anonymous_and_impersonated_requests_get_nothing() {
        let user = identity("max", false);
        let admin = identity("admin", true);
        let service = service_with_session(&user, PermissionWindowSettings::default()).await;

        let anonymous = service.alerts_for(&RequestContext::anonymous("/")).await;
        let impersonated = service
            .alerts_for(&RequestContext::impersonating(user, admin, "/"))
            .await;

        assert_eq!(anonymous.map(|alerts| alerts.len()).ok(), Some(0));
        assert_eq!(impersonated.map(|alerts| alerts.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn suppressed_when_messages_are_off() {
        let user = identity("max", false);
        let settings = PermissionWindowSettings::default().with_display_messages(false);
        let service = service_with_session(&user, settings).await;

        let alerts = service
            .alerts_for(&RequestContext::authenticated(user, "/"))
            .await;

        assert_eq!(alerts.map(|alerts| alerts.len()).ok(), Some(0));
    }
}
