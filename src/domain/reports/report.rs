use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ReportId, Timestamp};

use super::ReportCategory;

/// A row of the `user_accessible_analyses` view.
///
/// `has_access` is computed by the view for the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub ticker: String,
    pub company_name: Option<String>,
    pub title: String,
    pub report_type: String,
    pub summary: Option<String>,
    pub is_premium: bool,
    pub has_access: bool,
    pub published_at: Option<Timestamp>,
}

/// A report labelled with its category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedReport {
    #[serde(flatten)]
    pub report: Report,
    pub category: ReportCategory,
}
