//! Axum router configuration for the JSON API.

use axum::{
    routing::{get, post},
    Router,
};

use super::super::state::AppState;
use super::handlers::{
    check_entitlement, create_checkout_session, get_pricing, list_reports,
    list_waitlist_requests, manage_subscription, privacy_dashboard, stripe_webhook,
};

/// Create the API router, mounted at `/api`.
///
/// # Routes
///
/// ## Public
/// - `GET /pricing` - Active products and prices
/// - `GET /entitlements/:name` - Entitlement check (anonymous callers are denied)
///
/// ## Authenticated
/// - `POST /create-checkout-session` - Start checkout
/// - `POST /manage-subscription` - Cancel or reactivate
/// - `GET /reports` - Report listing
/// - `GET /privacy` - Privacy dashboard
/// - `GET /waitlist` - Own waitlist requests
///
/// ## Webhook (no auth, signature verified)
/// - `POST /stripe-webhook`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing", get(get_pricing))
        .route("/entitlements/:name", get(check_entitlement))
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/manage-subscription", post(manage_subscription))
        .route("/reports", get(list_reports))
        .route("/privacy", get(privacy_dashboard))
        .route("/waitlist", get(list_waitlist_requests))
        .route("/stripe-webhook", post(stripe_webhook))
}
