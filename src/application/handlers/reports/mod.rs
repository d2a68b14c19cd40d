//! Report handlers.

mod list_reports;

// Queries
pub use list_reports::{ListReportsHandler, ListReportsQuery};
