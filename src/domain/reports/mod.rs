//! Research reports and their REIT/MLP/equity labelling.

mod classifier;
mod query;
mod report;

pub use classifier::{ReportCategory, ReportClassifier};
pub use query::{AccessFilter, ReportFilter, ReportPage, ReportQuery, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use report::{ClassifiedReport, Report};
