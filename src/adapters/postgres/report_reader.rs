//! PostgreSQL implementation of ReportReader.
//!
//! Reads `user_accessible_analyses`, which carries one row per
//! (viewer, report) pair with the viewer's `has_access` pre-computed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ReportId, Timestamp, UserId};
use crate::domain::reports::{AccessFilter, Report, ReportClassifier, ReportFilter};
use crate::ports::{Page, ReportReader, ReportRows};

pub struct PostgresReportReader {
    pool: PgPool,
}

impl PostgresReportReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ReportRow {
    id: Uuid,
    ticker: String,
    company_name: Option<String>,
    title: String,
    report_type: String,
    summary: Option<String>,
    is_premium: bool,
    has_access: bool,
    published_at: Option<DateTime<Utc>>,
}

impl From<ReportRow> for Report {
    fn from(row: ReportRow) -> Self {
        Report {
            id: ReportId::from_uuid(row.id),
            ticker: row.ticker,
            company_name: row.company_name,
            title: row.title,
            report_type: row.report_type,
            summary: row.summary,
            is_premium: row.is_premium,
            has_access: row.has_access,
            published_at: row.published_at.map(Timestamp::from_datetime),
        }
    }
}

/// Appends the `WHERE` clause shared by the count and page queries.
fn push_filters<'a>(qb: &mut QueryBuilder<'a, Postgres>, viewer: &UserId, filter: &'a ReportFilter) {
    qb.push(" WHERE viewer_id = ").push_bind(*viewer.as_uuid());

    if let Some(ticker) = &filter.ticker {
        qb.push(" AND upper(ticker) = upper(").push_bind(ticker).push(")");
    }
    if let Some(report_type) = &filter.report_type {
        qb.push(" AND report_type = ").push_bind(report_type);
    }
    match filter.access {
        AccessFilter::All => {}
        AccessFilter::Accessible => {
            qb.push(" AND has_access");
        }
        AccessFilter::Locked => {
            qb.push(" AND NOT has_access");
        }
    }
}

fn count_query<'a>(viewer: &UserId, filter: &'a ReportFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM user_accessible_analyses");
    push_filters(&mut qb, viewer, filter);
    qb
}

fn rows_query<'a>(
    viewer: &UserId,
    filter: &'a ReportFilter,
    page: Option<Page>,
) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT id, ticker, company_name, title, report_type, summary, is_premium, \
         has_access, published_at FROM user_accessible_analyses",
    );
    push_filters(&mut qb, viewer, filter);
    qb.push(" ORDER BY published_at DESC NULLS LAST, id");
    if let Some(page) = page {
        qb.push(" LIMIT ")
            .push_bind(i64::from(page.limit))
            .push(" OFFSET ")
            .push_bind(i64::from(page.offset));
    }
    qb
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("{}: {}", context, e))
}

#[async_trait]
impl ReportReader for PostgresReportReader {
    async fn list(
        &self,
        viewer: &UserId,
        filter: &ReportFilter,
        page: Option<Page>,
    ) -> Result<ReportRows, DomainError> {
        let mut count = count_query(viewer, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count reports", e))?;

        let mut select = rows_query(viewer, filter, page);
        let rows: Vec<ReportRow> = select
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list reports", e))?;

        Ok(ReportRows {
            rows: rows.into_iter().map(Report::from).collect(),
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn load_classifier(&self) -> Result<ReportClassifier, DomainError> {
        let reits: Vec<String> = sqlx::query_scalar("SELECT ticker FROM reits")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load REIT tickers", e))?;
        let mlps: Vec<String> = sqlx::query_scalar("SELECT ticker FROM mlps")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to load MLP tickers", e))?;

        Ok(ReportClassifier::new(reits, mlps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfiltered_query_scopes_to_viewer() {
        let filter = ReportFilter::default();
        let qb = count_query(&UserId::new(), &filter);
        assert_eq!(
            qb.sql(),
            "SELECT COUNT(*) FROM user_accessible_analyses WHERE viewer_id = $1"
        );
    }

    #[test]
    fn filters_are_bound_in_order() {
        let filter = ReportFilter {
            ticker: Some("EPD".to_string()),
            report_type: Some("earnings".to_string()),
            access: AccessFilter::Locked,
        };
        let qb = rows_query(&UserId::new(), &filter, Some(Page { limit: 20, offset: 40 }));
        let sql = qb.sql();

        assert!(sql.contains("upper(ticker) = upper($2)"));
        assert!(sql.contains("report_type = $3"));
        assert!(sql.contains("AND NOT has_access"));
        assert!(sql.ends_with("LIMIT $4 OFFSET $5"));
    }

    #[test]
    fn unpaged_query_has_no_limit() {
        let filter = ReportFilter {
            access: AccessFilter::Accessible,
            ..Default::default()
        };
        let qb = rows_query(&UserId::new(), &filter, None);
        assert!(qb.sql().contains("AND has_access"));
        assert!(!qb.sql().contains("LIMIT"));
    }
}
