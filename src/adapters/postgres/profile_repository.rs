//! PostgreSQL implementation of ProfileRepository.
//!
//! Billing columns are written with a dynamically built `UPDATE` so that a
//! mutation only touches the columns it owns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::billing::{BillingColumns, ProfileSelector, SubscriptionStatus};
use crate::domain::foundation::{DomainError, Timestamp, UserId};
use crate::domain::privacy::PrivacyPreferences;
use crate::domain::profile::{Entitlements, OrganizationType, ProfileDetails, UserProfile};
use crate::domain::waitlist::WaitlistStatus;
use crate::ports::ProfileRepository;

pub struct PostgresProfileRepository {
    pool: PgPool,
}

impl PostgresProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a profile.
#[derive(Debug, sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    organization_name: Option<String>,
    organization_type: Option<String>,
    job_title: Option<String>,
    phone: Option<String>,
    stripe_customer_id: Option<String>,
    subscription_id: Option<String>,
    subscription_status: Option<String>,
    subscription_plan_id: Option<String>,
    subscription_current_period_start: Option<DateTime<Utc>>,
    subscription_current_period_end: Option<DateTime<Utc>>,
    subscription_cancel_at_period_end: bool,
    has_paid: bool,
    entitlements: serde_json::Value,
    marketing_emails: bool,
    analytics_tracking: bool,
    third_party_sharing: bool,
    privacy_updated_at: Option<DateTime<Utc>>,
    waitlist_status: Option<String>,
    waitlist_joined_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for UserProfile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let organization_type = row
            .organization_type
            .as_deref()
            .map(str::parse::<OrganizationType>)
            .transpose()
            .map_err(|e| DomainError::database(format!("Invalid organization_type: {}", e)))?;

        let waitlist_status = row
            .waitlist_status
            .as_deref()
            .map(str::parse::<WaitlistStatus>)
            .transpose()
            .map_err(|e| DomainError::database(format!("Invalid waitlist_status: {}", e)))?;

        Ok(UserProfile {
            id: UserId::from_uuid(row.id),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            organization_name: row.organization_name,
            organization_type,
            job_title: row.job_title,
            phone: row.phone,
            stripe_customer_id: row.stripe_customer_id,
            subscription_id: row.subscription_id,
            // statuses added by the processor later are kept as unknown
            subscription_status: row
                .subscription_status
                .as_deref()
                .map(SubscriptionStatus::parse_lenient),
            subscription_plan_id: row.subscription_plan_id,
            subscription_current_period_start: row
                .subscription_current_period_start
                .map(Timestamp::from_datetime),
            subscription_current_period_end: row
                .subscription_current_period_end
                .map(Timestamp::from_datetime),
            subscription_cancel_at_period_end: row.subscription_cancel_at_period_end,
            has_paid: row.has_paid,
            entitlements: Entitlements::from_json(&row.entitlements),
            privacy: PrivacyPreferences {
                marketing_emails: row.marketing_emails,
                analytics_tracking: row.analytics_tracking,
                third_party_sharing: row.third_party_sharing,
                updated_at: row.privacy_updated_at.map(Timestamp::from_datetime),
            },
            waitlist_status,
            waitlist_joined_at: row.waitlist_joined_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

fn as_datetime(ts: Option<Timestamp>) -> Option<DateTime<Utc>> {
    ts.map(|t| *t.as_datetime())
}

/// Builds the `UPDATE` for a billing mutation. Returns `None` when there is
/// nothing to write.
fn billing_update<'a>(
    selector: &'a ProfileSelector,
    columns: &'a BillingColumns,
) -> Option<QueryBuilder<'a, Postgres>> {
    if columns.is_empty() {
        return None;
    }

    let mut qb = QueryBuilder::new("UPDATE user_profiles SET updated_at = now()");

    if let Some(customer_id) = &columns.stripe_customer_id {
        qb.push(", stripe_customer_id = ").push_bind(customer_id);
    }
    if let Some(sub) = &columns.subscription {
        qb.push(", subscription_id = ")
            .push_bind(&sub.subscription_id)
            .push(", subscription_status = ")
            .push_bind(sub.status.map(|s| s.as_str()))
            .push(", subscription_plan_id = ")
            .push_bind(&sub.plan_id)
            .push(", subscription_current_period_start = ")
            .push_bind(as_datetime(sub.current_period_start))
            .push(", subscription_current_period_end = ")
            .push_bind(as_datetime(sub.current_period_end))
            .push(", subscription_cancel_at_period_end = ")
            .push_bind(sub.cancel_at_period_end);
    }
    if let Some(has_paid) = columns.has_paid {
        qb.push(", has_paid = ").push_bind(has_paid);
    }
    if let Some(entitlements) = &columns.entitlements {
        qb.push(", entitlements = ").push_bind(entitlements.to_json());
    }

    match selector {
        ProfileSelector::UserId(id) => {
            qb.push(" WHERE id = ").push_bind(*id.as_uuid());
        }
        ProfileSelector::Email(email) => {
            qb.push(" WHERE lower(email) = lower(").push_bind(email).push(")");
        }
        ProfileSelector::CustomerId(customer_id) => {
            qb.push(" WHERE stripe_customer_id = ").push_bind(customer_id);
        }
    }

    Some(qb)
}

#[async_trait]
impl ProfileRepository for PostgresProfileRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, DomainError> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"
            SELECT id, email, first_name, last_name, organization_name, organization_type,
                   job_title, phone, stripe_customer_id, subscription_id, subscription_status,
                   subscription_plan_id, subscription_current_period_start,
                   subscription_current_period_end, subscription_cancel_at_period_end,
                   has_paid, entitlements, marketing_emails, analytics_tracking,
                   third_party_sharing, privacy_updated_at, waitlist_status,
                   waitlist_joined_at, created_at, updated_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to fetch profile", e))?;

        row.map(UserProfile::try_from).transpose()
    }

    async fn upsert_details(
        &self,
        id: &UserId,
        email: &str,
        details: &ProfileDetails,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles (
                id, email, first_name, last_name, organization_name, organization_type,
                job_title, phone, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now())
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                organization_name = EXCLUDED.organization_name,
                organization_type = EXCLUDED.organization_type,
                job_title = EXCLUDED.job_title,
                phone = EXCLUDED.phone,
                updated_at = now()
            "#,
        )
        .bind(id.as_uuid())
        .bind(email)
        .bind(&details.first_name)
        .bind(&details.last_name)
        .bind(&details.organization_name)
        .bind(details.organization_type.as_str())
        .bind(&details.job_title)
        .bind(&details.phone)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to upsert profile", e))?;

        Ok(())
    }

    async fn apply_billing(
        &self,
        selector: &ProfileSelector,
        columns: &BillingColumns,
    ) -> Result<u64, DomainError> {
        let Some(mut qb) = billing_update(selector, columns) else {
            return Ok(0);
        };

        let result = qb
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to apply billing update", e))?;

        Ok(result.rows_affected())
    }

    async fn update_privacy_preferences(
        &self,
        id: &UserId,
        preferences: &PrivacyPreferences,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles SET
                marketing_emails = $2,
                analytics_tracking = $3,
                third_party_sharing = $4,
                privacy_updated_at = $5,
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(preferences.marketing_emails)
        .bind(preferences.analytics_tracking)
        .bind(preferences.third_party_sharing)
        .bind(as_datetime(preferences.updated_at))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update privacy preferences", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_waitlist_pending(&self, id: &UserId, now: Timestamp) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE user_profiles SET
                waitlist_status = $2,
                waitlist_joined_at = COALESCE(waitlist_joined_at, $3),
                updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(WaitlistStatus::Pending.as_str())
        .bind(now.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update waitlist status", e))?;

        Ok(result.rows_affected() > 0)
    }
}
