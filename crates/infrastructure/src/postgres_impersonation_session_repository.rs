//! Read-only view over the external impersonation system's session log.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use impersonate_application::{
    ImpersonationSessionRepository, OpenImpersonationSession, UserSummary,
};
use impersonate_core::{AppError, AppResult, UserId};

/// PostgreSQL implementation of the impersonation session port.
#[derive(Clone)]
pub struct PostgresImpersonationSessionRepository {
    pool: PgPool,
}

impl PostgresImpersonationSessionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OpenSessionRow {
    session_key: String,
    impersonating_id: uuid::Uuid,
    session_started_at: DateTime<Utc>,
    impersonator_id: uuid::Uuid,
    impersonator_username: String,
    impersonator_first_name: String,
    impersonator_last_name: String,
    impersonator_email: Option<String>,
}

impl From<OpenSessionRow> for OpenImpersonationSession {
    fn from(row: OpenSessionRow) -> Self {
        Self {
            session_key: row.session_key,
            impersonator: UserSummary {
                user_id: UserId::from_uuid(row.impersonator_id),
                username: row.impersonator_username,
                first_name: row.impersonator_first_name,
                last_name: row.impersonator_last_name,
                email: row.impersonator_email,
            },
            impersonating_user_id: UserId::from_uuid(row.impersonating_id),
            session_started_at: row.session_started_at,
        }
    }
}

#[async_trait]
impl ImpersonationSessionRepository for PostgresImpersonationSessionRepository {
    async fn list_open_sessions(
        &self,
        user_id: UserId,
    ) -> AppResult<Vec<OpenImpersonationSession>> {
        let rows = sqlx::query_as::<_, OpenSessionRow>(
            r#"
            SELECT
                log.session_key,
                log.impersonating_id,
                log.session_started_at,
                impersonator.id AS impersonator_id,
                impersonator.username AS impersonator_username,
                impersonator.first_name AS impersonator_first_name,
                impersonator.last_name AS impersonator_last_name,
                impersonator.email AS impersonator_email
            FROM impersonation_log log
            INNER JOIN users impersonator ON impersonator.id = log.impersonator_id
            WHERE log.impersonating_id = $1
              AND log.session_started_at <= now()
              AND log.session_ended_at IS NULL
            ORDER BY log.session_started_at ASC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to list open impersonation sessions: {error}"))
        })?;

        Ok(rows.into_iter().map(OpenImpersonationSession::from).collect())
    }
}
