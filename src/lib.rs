//! Research Portal - subscription-gated financial research service
//!
//! Registration with a firm profile, payment-processor webhook reconciliation
//! into entitlement flags, privacy self-service, an early-access waitlist and
//! a report listing labelled REIT / MLP / equity.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
