//! Per-request flash message buffer backed by the session.

use std::sync::Arc;

use impersonate_core::AppError;
use impersonate_domain::FlashMessage;
use tokio::sync::Mutex;
use tower_sessions::Session;

use crate::error::ApiResult;

pub const SESSION_FLASH_KEY: &str = "flash_messages";

/// Most messages kept for a session that never drains them.
pub const MAX_QUEUED_MESSAGES: usize = 20;

/// Messages queued for the current user, shared between middleware and
/// handlers through request extensions.
#[derive(Debug, Clone, Default)]
pub struct FlashMessages {
    messages: Arc<Mutex<Vec<FlashMessage>>>,
}

impl FlashMessages {
    /// Loads messages left over from earlier requests.
    pub async fn load(session: &Session) -> ApiResult<Self> {
        let messages = session
            .get::<Vec<FlashMessage>>(SESSION_FLASH_KEY)
            .await
            .map_err(|error| AppError::Internal(format!("failed to read flash messages: {error}")))?
            .unwrap_or_default();

        Ok(Self {
            messages: Arc::new(Mutex::new(messages)),
        })
    }

    /// Queues a message unless an identical one is already waiting. The
    /// oldest messages are dropped past [`MAX_QUEUED_MESSAGES`].
    pub async fn push(&self, message: FlashMessage) {
        let mut messages = self.messages.lock().await;
        if messages.contains(&message) {
            return;
        }

        messages.push(message);
        let overflow = messages.len().saturating_sub(MAX_QUEUED_MESSAGES);
        messages.drain(..overflow);
    }

    /// Takes every queued message, leaving the buffer empty.
    pub async fn drain(&self) -> Vec<FlashMessage> {
        std::mem::take(&mut *self.messages.lock().await)
    }

    /// Writes the remaining messages back to the session.
    pub async fn persist(&self, session: &Session) -> ApiResult<()> {
        let messages = self.messages.lock().await.clone();

        if messages.is_empty() {
            session
                .remove::<Vec<FlashMessage>>(SESSION_FLASH_KEY)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to clear flash messages: {error}"))
                })?;
        } else {
            session
                .insert(SESSION_FLASH_KEY, messages)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to store flash messages: {error}"))
                })?;
        }

        Ok(())
    }
}
