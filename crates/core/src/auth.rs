use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::UserId;

/// User information persisted in the authenticated session.
///
/// The external authentication and impersonation system writes this value into
/// the session; while impersonating, the session holds one identity for the
/// impersonated user and one for the staff member acting as them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    user_id: UserId,
    username: String,
    display_name: String,
    email: Option<String>,
    #[serde(default)]
    is_staff: bool,
}

impl UserIdentity {
    /// Creates a user identity from authentication data.
    #[must_use]
    pub fn new(
        user_id: UserId,
        username: impl Into<String>,
        display_name: impl Into<String>,
        email: Option<String>,
        is_staff: bool,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            display_name: display_name.into(),
            email,
            is_staff,
        }
    }

    /// Returns the stable user identifier.
    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the login name.
    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Returns the display name for the current user.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns whether the user is a staff member.
    #[must_use]
    pub fn is_staff(&self) -> bool {
        self.is_staff
    }
}

impl Display for UserIdentity {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        if self.display_name.trim().is_empty() {
            write!(formatter, "{}", self.username)
        } else {
            write!(formatter, "{}", self.display_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::UserIdentity;
    use crate::UserId;

    #[test]
    fn display_falls_back_to_username() {
        let identity = UserIdentity::new(UserId::new(), "max", " ", None, false);
        assert_eq!(identity.to_string(), "max");
    }

    #[test]
    fn missing_staff_flag_deserializes_as_false() {
        let user_id = UserId::new();
        let payload = format!(
            r#"{{"user_id":"{user_id}","username":"max","display_name":"Max","email":null}}"#
        );
        let identity = serde_json::from_str::<UserIdentity>(payload.as_str());
        assert!(identity.is_ok_and(|identity| !identity.is_staff()));
    }
}
