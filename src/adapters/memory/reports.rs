//! In-memory report store.
//!
//! Premium reports are accessible to viewers registered with
//! [`InMemoryReportReader::grant_premium`]; free reports to everyone.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::reports::{Report, ReportClassifier, ReportFilter};
use crate::ports::{Page, ReportReader, ReportRows};

#[derive(Debug, Default)]
struct ReportState {
    reports: Vec<Report>,
    premium_viewers: HashSet<UserId>,
    reits: Vec<String>,
    mlps: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryReportReader {
    state: Arc<RwLock<ReportState>>,
}

impl InMemoryReportReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_report(&self, report: Report) {
        self.state.write().await.reports.push(report);
    }

    pub async fn grant_premium(&self, viewer: UserId) {
        self.state.write().await.premium_viewers.insert(viewer);
    }

    pub async fn set_reference_tickers(&self, reits: Vec<String>, mlps: Vec<String>) {
        let mut state = self.state.write().await;
        state.reits = reits;
        state.mlps = mlps;
    }
}

fn matches(report: &Report, filter: &ReportFilter) -> bool {
    if let Some(ticker) = &filter.ticker {
        if !report.ticker.eq_ignore_ascii_case(ticker) {
            return false;
        }
    }
    if let Some(report_type) = &filter.report_type {
        if report.report_type != *report_type {
            return false;
        }
    }
    filter.access.matches(report.has_access)
}

#[async_trait]
impl ReportReader for InMemoryReportReader {
    async fn list(
        &self,
        viewer: &UserId,
        filter: &ReportFilter,
        page: Option<Page>,
    ) -> Result<ReportRows, DomainError> {
        let state = self.state.read().await;
        let premium = state.premium_viewers.contains(viewer);

        let mut rows: Vec<Report> = state
            .reports
            .iter()
            .cloned()
            .map(|mut r| {
                r.has_access = !r.is_premium || premium;
                r
            })
            .filter(|r| matches(r, filter))
            .collect();
        rows.sort_by(|a, b| b.published_at.cmp(&a.published_at));

        let total = rows.len() as u64;
        let rows = match page {
            Some(page) => rows
                .into_iter()
                .skip(page.offset as usize)
                .take(page.limit as usize)
                .collect(),
            None => rows,
        };

        Ok(ReportRows { rows, total })
    }

    async fn load_classifier(&self) -> Result<ReportClassifier, DomainError> {
        let state = self.state.read().await;
        Ok(ReportClassifier::new(
            state.reits.clone(),
            state.mlps.clone(),
        ))
    }
}
