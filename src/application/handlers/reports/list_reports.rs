//! ListReportsHandler - query handler for the reports listing.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::reports::{ClassifiedReport, ReportPage, ReportQuery};
use crate::ports::{Page, ReportReader};

#[derive(Debug, Clone)]
pub struct ListReportsQuery {
    pub viewer: UserId,
    pub query: ReportQuery,
}

/// Lists reports visible to the viewer, labelled REIT/MLP/equity.
///
/// Store-side filters and pagination are pushed down. A category filter
/// needs the labels first, so it fetches every matching row and pages here.
pub struct ListReportsHandler {
    reports: Arc<dyn ReportReader>,
}

impl ListReportsHandler {
    pub fn new(reports: Arc<dyn ReportReader>) -> Self {
        Self { reports }
    }

    pub async fn handle(&self, q: ListReportsQuery) -> Result<ReportPage, DomainError> {
        let ReportQuery {
            filter,
            category,
            limit,
            offset,
        } = q.query;
        let classifier = self.reports.load_classifier().await?;

        let Some(category) = category else {
            let rows = self
                .reports
                .list(&q.viewer, &filter, Some(Page { limit, offset }))
                .await?;
            return Ok(ReportPage {
                reports: rows.rows.into_iter().map(|r| classifier.label(r)).collect(),
                total: rows.total,
            });
        };

        let matching: Vec<ClassifiedReport> = self
            .reports
            .list(&q.viewer, &filter, None)
            .await?
            .rows
            .into_iter()
            .map(|r| classifier.label(r))
            .filter(|r| r.category == category)
            .collect();

        let total = matching.len() as u64;
        let reports = matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        Ok(ReportPage { reports, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryReportReader;
    use crate::domain::foundation::{ReportId, Timestamp};
    use crate::domain::reports::{AccessFilter, Report, ReportCategory};

    fn report(ticker: &str, premium: bool, days_ago: i64) -> Report {
        Report {
            id: ReportId::new(),
            ticker: ticker.to_string(),
            company_name: None,
            title: format!("{} initiation", ticker),
            report_type: "initiation".to_string(),
            summary: None,
            is_premium: premium,
            has_access: false,
            published_at: Some(Timestamp::now().add_days(-days_ago)),
        }
    }

    async fn reader() -> InMemoryReportReader {
        let reader = InMemoryReportReader::new();
        reader
            .set_reference_tickers(vec!["O".to_string(), "PLD".to_string()], vec!["EPD".to_string()])
            .await;
        for (i, (ticker, premium)) in [("O", true), ("EPD", false), ("AAPL", true), ("PLD", false), ("MSFT", false)]
            .into_iter()
            .enumerate()
        {
            reader.add_report(report(ticker, premium, i as i64)).await;
        }
        reader
    }

    fn query(params: ReportQuery) -> ListReportsQuery {
        ListReportsQuery {
            viewer: UserId::new(),
            query: params,
        }
    }

    #[tokio::test]
    async fn labels_every_row() {
        let handler = ListReportsHandler::new(Arc::new(reader().await));
        let page = handler.handle(query(ReportQuery::default())).await.unwrap();

        assert_eq!(page.total, 5);
        let labels: Vec<(&str, ReportCategory)> = page
            .reports
            .iter()
            .map(|r| (r.report.ticker.as_str(), r.category))
            .collect();
        assert_eq!(
            labels,
            vec![
                ("O", ReportCategory::Reit),
                ("EPD", ReportCategory::Mlp),
                ("AAPL", ReportCategory::Equity),
                ("PLD", ReportCategory::Reit),
                ("MSFT", ReportCategory::Equity),
            ]
        );
    }

    #[tokio::test]
    async fn category_filter_counts_before_paging() {
        let handler = ListReportsHandler::new(Arc::new(reader().await));
        let page = handler
            .handle(query(ReportQuery {
                category: Some(ReportCategory::Reit),
                limit: 1,
                offset: 1,
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.reports.len(), 1);
        assert_eq!(page.reports[0].report.ticker, "PLD");
    }

    #[tokio::test]
    async fn pushed_down_paging_keeps_total() {
        let handler = ListReportsHandler::new(Arc::new(reader().await));
        let page = handler
            .handle(query(ReportQuery {
                limit: 2,
                ..Default::default()
            }))
            .await
            .unwrap();

        assert_eq!(page.total, 5);
        assert_eq!(page.reports.len(), 2);
    }

    #[tokio::test]
    async fn access_filter_uses_view_column() {
        let reader = reader().await;
        let viewer = UserId::new();
        let handler = ListReportsHandler::new(Arc::new(reader));

        let mut params = ReportQuery::default();
        params.filter.access = AccessFilter::Locked;
        let locked = handler
            .handle(ListReportsQuery {
                viewer,
                query: params,
            })
            .await
            .unwrap();

        assert_eq!(locked.total, 2);
        assert!(locked.reports.iter().all(|r| !r.report.has_access));
    }
}
