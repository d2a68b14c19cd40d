//! PostgreSQL implementation of WaitlistRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, Timestamp, UserId, WaitlistRequestId};
use crate::domain::waitlist::{WaitlistRequest, WaitlistStatus};
use crate::ports::WaitlistRepository;

pub struct PostgresWaitlistRepository {
    pool: PgPool,
}

impl PostgresWaitlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct WaitlistRow {
    id: Uuid,
    user_id: Uuid,
    email: String,
    feature: String,
    message: Option<String>,
    referral_source: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WaitlistRow> for WaitlistRequest {
    type Error = DomainError;

    fn try_from(row: WaitlistRow) -> Result<Self, Self::Error> {
        let status: WaitlistStatus = row
            .status
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid waitlist status: {}", e)))?;

        Ok(WaitlistRequest {
            id: WaitlistRequestId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            email: row.email,
            feature: row.feature,
            message: row.message,
            referral_source: row.referral_source,
            status,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl WaitlistRepository for PostgresWaitlistRepository {
    async fn append(&self, request: &WaitlistRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO waitlist_requests (
                id, user_id, email, feature, message, referral_source, status, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.user_id.as_uuid())
        .bind(&request.email)
        .bind(&request.feature)
        .bind(&request.message)
        .bind(&request.referral_source)
        .bind(request.status.as_str())
        .bind(request.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record waitlist request: {}", e)))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<WaitlistRequest>, DomainError> {
        let rows: Vec<WaitlistRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, email, feature, message, referral_source, status, created_at
            FROM waitlist_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list waitlist requests: {}", e)))?;

        rows.into_iter().map(WaitlistRequest::try_from).collect()
    }
}
