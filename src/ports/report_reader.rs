//! Read-only access to published reports and the ticker reference tables.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::reports::{Report, ReportClassifier, ReportFilter};

/// Offset pagination pushed down to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

/// Rows plus the number matching before pagination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportRows {
    pub rows: Vec<Report>,
    pub total: u64,
}

#[async_trait]
pub trait ReportReader: Send + Sync {
    /// Lists reports as seen by `viewer`, newest first.
    ///
    /// With `page = None` every matching row is returned.
    async fn list(
        &self,
        viewer: &UserId,
        filter: &ReportFilter,
        page: Option<Page>,
    ) -> Result<ReportRows, DomainError>;

    /// Loads the `reits` and `mlps` ticker tables.
    async fn load_classifier(&self) -> Result<ReportClassifier, DomainError>;
}
