//! HTTP adapter - axum router, shared state and request plumbing.
//!
//! - `api` - JSON endpoints under `/api`
//! - `actions` - same-origin form actions answering with redirects
//! - `middleware` - session resolution from Bearer tokens or cookies

pub mod actions;
pub mod api;
pub mod error;
pub mod middleware;
pub mod redirect;
mod router;
mod state;

pub use error::{ApiError, ErrorResponse};
pub use router::{build_router, RouterConfig};
pub use state::{AppState, HttpSettings, Ports};
