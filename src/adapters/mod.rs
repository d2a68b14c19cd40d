//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - hosted auth service (JWT validation, REST client) and mocks
//! - `stripe` - payment processor API client and mock
//! - `postgres` - relational store
//! - `memory` - in-process stores for tests and local runs
//! - `http` - axum router exposing the application

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
