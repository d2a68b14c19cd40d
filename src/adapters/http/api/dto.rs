//! JSON bodies and query strings for `/api/*`. Field names are camelCase
//! for the browser client.

use serde::{Deserialize, Serialize};

use crate::domain::billing::SubscriptionSnapshot;
use crate::domain::foundation::UserId;

/// `POST /api/create-checkout-session`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutSessionRequest {
    #[serde(default)]
    pub price_id: Option<String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// `POST /api/manage-subscription`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManageSubscriptionRequest {
    #[serde(default)]
    pub subscription_id: Option<String>,
    /// `cancel` or `reactivate`.
    #[serde(default)]
    pub action: Option<String>,
}

/// `GET /api/reports` query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportsParams {
    pub ticker: Option<String>,
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub access: Option<String>,
    pub category: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSessionResponse {
    pub session_id: String,
    /// Hosted checkout page to send the browser to.
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManageSubscriptionResponse {
    pub subscription: SubscriptionSnapshot,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitlementResponse {
    pub entitlement: String,
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
