//! PostgreSQL implementation of PrivacyRequestRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, PrivacyRequestId, Timestamp, UserId};
use crate::domain::privacy::{PrivacyRequest, PrivacyRequestStatus, PrivacyRequestType};
use crate::ports::PrivacyRequestRepository;

pub struct PostgresPrivacyRequestRepository {
    pool: PgPool,
}

impl PostgresPrivacyRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PrivacyRequestRow {
    id: Uuid,
    user_id: Uuid,
    request_type: String,
    status: String,
    details: serde_json::Value,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<PrivacyRequestRow> for PrivacyRequest {
    type Error = DomainError;

    fn try_from(row: PrivacyRequestRow) -> Result<Self, Self::Error> {
        let request_type: PrivacyRequestType = row
            .request_type
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid request_type: {}", e)))?;
        let status: PrivacyRequestStatus = row
            .status
            .parse()
            .map_err(|e| DomainError::database(format!("Invalid status: {}", e)))?;

        Ok(PrivacyRequest {
            id: PrivacyRequestId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            request_type,
            status,
            details: row.details,
            created_at: Timestamp::from_datetime(row.created_at),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
        })
    }
}

#[async_trait]
impl PrivacyRequestRepository for PostgresPrivacyRequestRepository {
    async fn append(&self, request: &PrivacyRequest) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO privacy_requests (
                id, user_id, request_type, status, details, created_at, completed_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(request.id.as_uuid())
        .bind(request.user_id.as_uuid())
        .bind(request.request_type.as_str())
        .bind(request.status.as_str())
        .bind(&request.details)
        .bind(request.created_at.as_datetime())
        .bind(request.completed_at.map(|t| *t.as_datetime()))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to record privacy request: {}", e)))?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<PrivacyRequest>, DomainError> {
        let rows: Vec<PrivacyRequestRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, request_type, status, details, created_at, completed_at
            FROM privacy_requests
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list privacy requests: {}", e)))?;

        rows.into_iter().map(PrivacyRequest::try_from).collect()
    }
}
