//! HTTP handlers for the JSON API.
//!
//! These handlers connect axum routes to application layer command/query handlers.

use axum::body::Bytes;
use axum::extract::{Json, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;

use crate::application::handlers::billing::{
    HandleBillingWebhookCommand, HandleBillingWebhookResult,
};
use crate::application::handlers::catalog::GetPricingQuery;
use crate::application::handlers::entitlement::CheckEntitlementQuery;
use crate::application::handlers::privacy::GetPrivacyDashboardQuery;
use crate::application::handlers::reports::ListReportsQuery;
use crate::application::handlers::subscription::{
    CreateCheckoutSessionCommand, ManageSubscriptionCommand, SubscriptionAction,
};
use crate::application::handlers::waitlist::ListWaitlistRequestsQuery;
use crate::domain::foundation::ValidationError;
use crate::domain::reports::ReportQuery;

use super::super::error::ApiError;
use super::super::middleware::{OptionalAuth, RequireAuth};
use super::super::state::AppState;
use super::dto::{
    CheckoutSessionResponse, CreateCheckoutSessionRequest, EntitlementResponse, HealthResponse,
    ManageSubscriptionRequest, ManageSubscriptionResponse, ReportsParams, WebhookAck,
};

// ════════════════════════════════════════════════════════════════════════════════
// Billing
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/stripe-webhook - Reconcile a signed processor event
pub async fn stripe_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::bad_request("Missing Stripe-Signature header"))?;

    let cmd = HandleBillingWebhookCommand {
        payload: body.to_vec(),
        signature: signature.to_string(),
    };

    match state.webhook_handler().handle(cmd).await? {
        HandleBillingWebhookResult::Reconciled { event_id, rows, .. } => {
            tracing::debug!(event_id = %event_id, rows, "Webhook acknowledged");
        }
        HandleBillingWebhookResult::Ignored { event_id, reason } => {
            tracing::debug!(event_id = %event_id, reason = %reason, "Webhook ignored");
        }
    }

    Ok(Json(WebhookAck { received: true }))
}

/// POST /api/create-checkout-session - Start a hosted subscription checkout
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<CreateCheckoutSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = request
        .user_id
        .ok_or_else(|| ValidationError::empty_field("userId"))?;

    let cmd = CreateCheckoutSessionCommand {
        caller: user,
        user_id,
        price_id: request.price_id.unwrap_or_default(),
        redirect_url: request.redirect_url,
    };

    let session = state.checkout_handler().handle(cmd).await?;

    Ok(Json(CheckoutSessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/manage-subscription - Cancel or reactivate at period end
pub async fn manage_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<ManageSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let action: SubscriptionAction = request
        .action
        .as_deref()
        .ok_or_else(|| ValidationError::empty_field("action"))?
        .parse()?;

    let cmd = ManageSubscriptionCommand {
        user_id: user.id,
        subscription_id: request.subscription_id.unwrap_or_default(),
        action,
    };

    let subscription = state.manage_subscription_handler().handle(cmd).await?;

    Ok(Json(ManageSubscriptionResponse { subscription }))
}

/// GET /api/pricing - Active products and prices
pub async fn get_pricing(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let products = state.pricing_handler().handle(GetPricingQuery).await?;
    Ok(Json(products))
}

/// GET /api/entitlements/:name - Whether the caller holds an entitlement
pub async fn check_entitlement(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    Path(name): Path<String>,
) -> impl IntoResponse {
    let query = CheckEntitlementQuery {
        user_id: user.map(|u| u.id),
        entitlement: name.clone(),
    };

    let result = state.entitlement_handler().handle(query).await;

    Json(EntitlementResponse {
        entitlement: name,
        has_access: result.has_access(),
        reason: result.reason_message(),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Reports, privacy, waitlist
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/reports - Reports visible to the caller, labelled by category
pub async fn list_reports(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ReportsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ReportQuery::from_params(
        params.ticker.as_deref(),
        params.report_type.as_deref(),
        params.access.as_deref(),
        params.category.as_deref(),
        params.limit,
        params.offset,
    )?;

    let page = state
        .list_reports_handler()
        .handle(ListReportsQuery {
            viewer: user.id,
            query,
        })
        .await?;

    Ok(Json(page))
}

/// GET /api/privacy - Preferences and request history
pub async fn privacy_dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let dashboard = state
        .privacy_dashboard_handler()
        .handle(GetPrivacyDashboardQuery { user_id: user.id })
        .await?;
    Ok(Json(dashboard))
}

/// GET /api/waitlist - The caller's waitlist requests
pub async fn list_waitlist_requests(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<impl IntoResponse, ApiError> {
    let requests = state
        .list_waitlist_handler()
        .handle(ListWaitlistRequestsQuery { user_id: user.id })
        .await?;
    Ok(Json(requests))
}

/// GET /health
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
