use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::{ClassifiedReport, ReportCategory};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessFilter {
    #[default]
    All,
    Accessible,
    Locked,
}

impl AccessFilter {
    pub fn matches(&self, has_access: bool) -> bool {
        match self {
            AccessFilter::All => true,
            AccessFilter::Accessible => has_access,
            AccessFilter::Locked => !has_access,
        }
    }
}

impl FromStr for AccessFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(AccessFilter::All),
            "accessible" => Ok(AccessFilter::Accessible),
            "locked" => Ok(AccessFilter::Locked),
            other => Err(ValidationError::invalid_format(
                "access",
                format!("expected all, accessible or locked, got '{}'", other),
            )),
        }
    }
}

/// Filters pushed down to the report store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Matched case-insensitively.
    pub ticker: Option<String>,
    pub report_type: Option<String>,
    pub access: AccessFilter,
}

/// A validated `GET /api/reports` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub filter: ReportFilter,
    /// Applied after classification, not by the store.
    pub category: Option<ReportCategory>,
    pub limit: u32,
    pub offset: u32,
}

impl Default for ReportQuery {
    fn default() -> Self {
        Self {
            filter: ReportFilter::default(),
            category: None,
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

impl ReportQuery {
    /// Builds a query from raw parameters, clamping `limit` to `1..=MAX_PAGE_SIZE`.
    pub fn from_params(
        ticker: Option<&str>,
        report_type: Option<&str>,
        access: Option<&str>,
        category: Option<&str>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, ValidationError> {
        let non_blank = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            filter: ReportFilter {
                ticker: non_blank(ticker).map(|t| t.to_ascii_uppercase()),
                report_type: non_blank(report_type),
                access: access.map(AccessFilter::from_str).transpose()?.unwrap_or_default(),
            },
            category: non_blank(category)
                .map(|c| c.parse::<ReportCategory>())
                .transpose()?,
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0),
        })
    }
}

/// One page of labelled reports and the count before pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPage {
    pub reports: Vec<ClassifiedReport>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_params() {
        let q = ReportQuery::from_params(None, None, None, None, None, None).unwrap();
        assert_eq!(q, ReportQuery::default());
    }

    #[test]
    fn ticker_is_uppercased_and_blank_dropped() {
        let q = ReportQuery::from_params(Some(" o "), Some(""), None, None, None, None).unwrap();
        assert_eq!(q.filter.ticker.as_deref(), Some("O"));
        assert!(q.filter.report_type.is_none());
    }

    #[test]
    fn limit_is_clamped() {
        let q = ReportQuery::from_params(None, None, None, None, Some(5000), Some(40)).unwrap();
        assert_eq!(q.limit, MAX_PAGE_SIZE);
        assert_eq!(q.offset, 40);
        let q = ReportQuery::from_params(None, None, None, None, Some(0), None).unwrap();
        assert_eq!(q.limit, 1);
    }

    #[test]
    fn invalid_access_filter_is_rejected() {
        assert!(ReportQuery::from_params(None, None, Some("open"), None, None, None).is_err());
    }

    #[test]
    fn access_filter_matches() {
        assert!(AccessFilter::All.matches(false));
        assert!(AccessFilter::Accessible.matches(true));
        assert!(!AccessFilter::Accessible.matches(false));
        assert!(AccessFilter::Locked.matches(false));
    }
}
