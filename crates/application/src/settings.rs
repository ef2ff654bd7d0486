//! Process-wide settings for permission windows.
//!
//! Built once at start-up and handed to the services that need them.
//! Environment values override the defaults below.

use chrono::Duration;

use impersonate_core::{AppError, AppResult};

/// Environment key for the window length in minutes.
pub const DEFAULT_EXPIRY_KEY: &str = "IMPERSONATE_PERMISSIONS_DEFAULT_EXPIRY";
/// Environment key toggling user-visible messages.
pub const DISPLAY_MESSAGES_KEY: &str = "IMPERSONATE_PERMISSIONS_DISPLAY_MESSAGES";
/// Environment key for the warning threshold in minutes.
pub const WARNING_INTERVAL_KEY: &str = "IMPERSONATE_PERMISSIONS_EXPIRY_WARNING_INTERVAL";
/// Environment key for the external stop-impersonation route.
pub const STOP_PATH_KEY: &str = "IMPERSONATE_STOP_PATH";

const DEFAULT_EXPIRY_MINUTES: i64 = 60;
const DEFAULT_WARNING_INTERVAL_MINUTES: i64 = 10;
const DEFAULT_STOP_PATH: &str = "/impersonate/stop/";

/// Settings shared by window creation and request enforcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionWindowSettings {
    default_expiry: Duration,
    display_messages: bool,
    warning_interval: Duration,
    stop_path: String,
}

impl PermissionWindowSettings {
    /// Creates validated settings.
    pub fn new(
        default_expiry_minutes: i64,
        display_messages: bool,
        warning_interval_minutes: i64,
        stop_path: impl Into<String>,
    ) -> AppResult<Self> {
        if default_expiry_minutes <= 0 {
            return Err(AppError::Configuration(format!(
                "{DEFAULT_EXPIRY_KEY} must be greater than zero, got {default_expiry_minutes}"
            )));
        }

        if warning_interval_minutes < 0 {
            return Err(AppError::Configuration(format!(
                "{WARNING_INTERVAL_KEY} must not be negative, got {warning_interval_minutes}"
            )));
        }

        let stop_path = stop_path.into();
        if !stop_path.starts_with('/') {
            return Err(AppError::Configuration(format!(
                "{STOP_PATH_KEY} must be an absolute path, got '{stop_path}'"
            )));
        }

        Ok(Self {
            default_expiry: Duration::minutes(default_expiry_minutes),
            display_messages,
            warning_interval: Duration::minutes(warning_interval_minutes),
            stop_path,
        })
    }

    /// Builds settings from a key lookup, typically `std::env::var`.
    /// Missing or blank keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let default_expiry = value(DEFAULT_EXPIRY_KEY)
            .map(|raw| parse_minutes(DEFAULT_EXPIRY_KEY, raw.as_str()))
            .transpose()?
            .unwrap_or(DEFAULT_EXPIRY_MINUTES);
        let display_messages = value(DISPLAY_MESSAGES_KEY)
            .map(|raw| parse_bool(DISPLAY_MESSAGES_KEY, raw.as_str()))
            .transpose()?
            .unwrap_or(true);
        let warning_interval = value(WARNING_INTERVAL_KEY)
            .map(|raw| parse_minutes(WARNING_INTERVAL_KEY, raw.as_str()))
            .transpose()?
            .unwrap_or(DEFAULT_WARNING_INTERVAL_MINUTES);
        let stop_path = value(STOP_PATH_KEY)
            .map(|raw| raw.trim().to_owned())
            .unwrap_or_else(|| DEFAULT_STOP_PATH.to_owned());

        Self::new(default_expiry, display_messages, warning_interval, stop_path)
    }

    /// Returns a copy with message display switched on or off.
    #[must_use]
    pub fn with_display_messages(mut self, display_messages: bool) -> Self {
        self.display_messages = display_messages;
        self
    }

    /// Returns the length of a newly created window.
    #[must_use]
    pub fn default_expiry(&self) -> Duration {
        self.default_expiry
    }

    /// Returns whether user-visible messages are emitted.
    #[must_use]
    pub fn display_messages(&self) -> bool {
        self.display_messages
    }

    /// Returns the remaining time below which a warning replaces the notice.
    #[must_use]
    pub fn warning_interval(&self) -> Duration {
        self.warning_interval
    }

    /// Returns the route that ends an impersonation session.
    #[must_use]
    pub fn stop_path(&self) -> &str {
        self.stop_path.as_str()
    }
}

impl Default for PermissionWindowSettings {
    fn default() -> Self {
        Self {
            default_expiry: Duration::minutes(DEFAULT_EXPIRY_MINUTES),
            display_messages: true,
            warning_interval: Duration::minutes(DEFAULT_WARNING_INTERVAL_MINUTES),
            stop_path: DEFAULT_STOP_PATH.to_owned(),
        }
    }
}

fn parse_minutes(key: &str, raw: &str) -> AppResult<i64> {
    raw.trim().parse::<i64>().map_err(|error| {
        AppError::Configuration(format!("{key} must be a whole number of minutes: {error}"))
    })
}

fn parse_bool(key: &str, raw: &str) -> AppResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Configuration(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}
