use serde::Serialize;

use impersonate_core::UserIdentity;

/// Explicit per-request view of authentication and impersonation state.
///
/// The external impersonation system decides who is impersonating whom; this
/// value only carries its decision into the checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    user: Option<UserIdentity>,
    impersonator: Option<UserIdentity>,
    path: String,
}

impl RequestContext {
    /// Request with no authenticated user.
    #[must_use]
    pub fn anonymous(path: impl Into<String>) -> Self {
        Self {
            user: None,
            impersonator: None,
            path: path.into(),
        }
    }

    /// Request made by `user` on their own behalf.
    #[must_use]
    pub fn authenticated(user: UserIdentity, path: impl Into<String>) -> Self {
        Self {
            user: Some(user),
            impersonator: None,
            path: path.into(),
        }
    }

    /// Request made by `impersonator` acting as `user`.
    #[must_use]
    pub fn impersonating(
        user: UserIdentity,
        impersonator: UserIdentity,
        path: impl Into<String>,
    ) -> Self {
        Self {
            user: Some(user),
            impersonator: Some(impersonator),
            path: path.into(),
        }
    }

    /// Returns the effective user: the impersonated account while impersonating.
    #[must_use]
    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    /// Returns the staff member acting as the user, if any.
    #[must_use]
    pub fn impersonator(&self) -> Option<&UserIdentity> {
        self.impersonator.as_ref()
    }

    /// Returns whether this request belongs to an impersonation session.
    #[must_use]
    pub fn is_impersonating(&self) -> bool {
        self.impersonator.is_some()
    }

    /// Returns the request path.
    #[must_use]
    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

/// Values exposed to views describing the impersonation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpersonationTemplateContext {
    /// Whether the request is impersonated.
    pub is_impersonating: bool,
    /// Staff member acting as the user.
    pub impersonator: Option<UserIdentity>,
    /// Account being impersonated.
    pub impersonating_user: Option<UserIdentity>,
}

impl ImpersonationTemplateContext {
    /// Builds the context for one request.
    #[must_use]
    pub fn from_request(context: &RequestContext) -> Self {
        match (context.user(), context.impersonator()) {
            (Some(user), Some(impersonator)) => Self {
                is_impersonating: true,
                impersonator: Some(impersonator.clone()),
                impersonating_user: Some(user.clone()),
            },
            _ => Self {
                is_impersonating: false,
                impersonator: None,
                impersonating_user: None,
            },
        }
    }
}
