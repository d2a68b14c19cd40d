//! Labels reports by ticker membership in the REIT and MLP reference tables.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

use super::{ClassifiedReport, Report};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Reit,
    Mlp,
    Equity,
}

impl ReportCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportCategory::Reit => "reit",
            ReportCategory::Mlp => "mlp",
            ReportCategory::Equity => "equity",
        }
    }
}

impl fmt::Display for ReportCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reit" => Ok(ReportCategory::Reit),
            "mlp" => Ok(ReportCategory::Mlp),
            "equity" | "other" => Ok(ReportCategory::Equity),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

/// Ticker sets loaded from the `reits` and `mlps` reference tables.
#[derive(Debug, Clone, Default)]
pub struct ReportClassifier {
    reits: HashSet<String>,
    mlps: HashSet<String>,
}

impl ReportClassifier {
    pub fn new<R, M>(reits: R, mlps: M) -> Self
    where
        R: IntoIterator<Item = String>,
        M: IntoIterator<Item = String>,
    {
        Self {
            reits: reits.into_iter().map(|t| normalize(&t)).collect(),
            mlps: mlps.into_iter().map(|t| normalize(&t)).collect(),
        }
    }

    /// REIT membership wins when a ticker appears in both tables.
    pub fn classify(&self, ticker: &str) -> ReportCategory {
        let ticker = normalize(ticker);
        if self.reits.contains(&ticker) {
            ReportCategory::Reit
        } else if self.mlps.contains(&ticker) {
            ReportCategory::Mlp
        } else {
            ReportCategory::Equity
        }
    }

    pub fn label(&self, report: Report) -> ClassifiedReport {
        ClassifiedReport {
            category: self.classify(&report.ticker),
            report,
        }
    }
}

fn normalize(ticker: &str) -> String {
    ticker.trim().to_ascii_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ReportClassifier {
        ReportClassifier::new(
            vec!["O".to_string(), "PLD".to_string(), "DUAL".to_string()],
            vec!["EPD".to_string(), "et".to_string(), "DUAL".to_string()],
        )
    }

    #[test]
    fn reit_tickers_are_reits() {
        assert_eq!(classifier().classify("PLD"), ReportCategory::Reit);
    }

    #[test]
    fn mlp_lookup_is_case_insensitive() {
        assert_eq!(classifier().classify("et"), ReportCategory::Mlp);
        assert_eq!(classifier().classify(" ET "), ReportCategory::Mlp);
    }

    #[test]
    fn reit_checked_before_mlp() {
        assert_eq!(classifier().classify("DUAL"), ReportCategory::Reit);
    }

    #[test]
    fn everything_else_is_equity() {
        assert_eq!(classifier().classify("AAPL"), ReportCategory::Equity);
        assert_eq!(ReportClassifier::default().classify("O"), ReportCategory::Equity);
    }

    #[test]
    fn category_parses_other_as_equity() {
        assert_eq!("other".parse::<ReportCategory>(), Ok(ReportCategory::Equity));
        assert_eq!("REIT".parse::<ReportCategory>(), Ok(ReportCategory::Reit));
        assert!("bond".parse::<ReportCategory>().is_err());
    }
}
