use chrono::{DateTime, Utc};
use impersonate_core::{AppError, AppResult, UserId, UserIdentity};
use serde::Serialize;
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ready: bool,
    pub postgres: HealthDependencyStatus,
}

/// Health of one backing service.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-dependency-status.ts"
)]
pub struct HealthDependencyStatus {
    pub status: &'static str,
    pub detail: Option<String>,
}

/// Number of windows a disable request switched off.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/disabled-count-response.ts"
)]
pub struct DisabledCountResponse {
    pub disabled: u64,
}

/// API representation of a session identity.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-identity-response.ts"
)]
pub struct UserIdentityResponse {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            user_id: identity.user_id().to_string(),
            username: identity.username().to_owned(),
            display_name: identity.to_string(),
            email: identity.email().map(ToOwned::to_owned),
            is_staff: identity.is_staff(),
        }
    }
}

/// Parses an optional RFC 3339 timestamp from a request payload.
pub fn parse_optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> AppResult<Option<DateTime<Utc>>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            DateTime::parse_from_rfc3339(value)
                .map(|parsed| parsed.with_timezone(&Utc))
                .map_err(|error| {
                    AppError::Validation(format!("{field} must be an RFC 3339 timestamp: {error}"))
                })
        })
        .transpose()
}

/// Parses an optional user id from a request payload.
pub fn parse_optional_user_id(value: Option<&str>) -> AppResult<Option<UserId>> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(UserId::parse)
        .transpose()
}

pub(crate) fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use impersonate_core::AppError;

    use super::{format_timestamp, parse_optional_timestamp, parse_optional_user_id};

    #[test]
    fn timestamps_accept_offsets_and_blank_values() {
        let parsed = parse_optional_timestamp("window_ends_at", Some("2026-03-01T12:00:00+01:00"));
        let blank = parse_optional_timestamp("window_ends_at", Some("  "));

        assert_eq!(
            parsed.ok().flatten(),
            Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).single()
        );
        assert_eq!(blank.ok(), Some(None));
    }

    #[test]
    fn malformed_input_is_a_validation_error() {
        let timestamp = parse_optional_timestamp("window_ends_at", Some("tomorrow"));
        let user_id = parse_optional_user_id(Some("not-a-uuid"));

        assert!(matches!(timestamp, Err(AppError::Validation(_))));
        assert!(matches!(user_id, Err(AppError::Validation(_))));
    }

    #[test]
    fn timestamps_format_as_utc_seconds() {
        let value = Utc.with_ymd_and_hms(2026, 3, 1, 11, 0, 0).single();

        assert_eq!(
            value.map(format_timestamp).as_deref(),
            Some("2026-03-01T11:00:00Z")
        );
    }
}
