//! JSON API consumed by the browser client and the payment processor.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::api_routes;
