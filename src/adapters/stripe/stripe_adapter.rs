//! Stripe payment provider adapter.
//!
//! Implements `PaymentProvider` against the Stripe REST API using form-encoded
//! requests and HTTP basic auth with the secret key.
//!
//! # Configuration
//!
//! ```ignore
//! let adapter = StripePaymentAdapter::new(StripeConfig::from_payment_config(&config.payment));
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::PaymentConfig;
use crate::domain::billing::stripe_event::{StripeCheckoutSession, StripeSubscription};
use crate::domain::billing::SubscriptionSnapshot;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentErrorCode, PaymentProvider,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.stripe_api_key.clone(),
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

/// Stripe payment provider adapter.
#[derive(Debug)]
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn subscription_url(&self, subscription_id: &str) -> String {
        format!(
            "{}/v1/subscriptions/{}",
            self.config.api_base_url, subscription_id
        )
    }

    async fn read_subscription(
        &self,
        response: reqwest::Response,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let response = check_status(response).await?;
        let stripe_sub: StripeSubscription = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;
        Ok(stripe_sub.to_snapshot())
    }
}

/// Form parameters for a subscription-mode checkout session.
///
/// The user id travels both as `client_reference_id` and in metadata on the
/// session and the subscription, so webhooks can link the profile either way.
fn checkout_params(request: &CreateCheckoutRequest) -> Vec<(&'static str, String)> {
    let user_id = request.user_id.to_string();
    let mut params = vec![
        ("mode", "subscription".to_string()),
        ("line_items[0][price]", request.price_id.clone()),
        ("line_items[0][quantity]", "1".to_string()),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("client_reference_id", user_id.clone()),
        ("metadata[user_id]", user_id.clone()),
        ("subscription_data[metadata][user_id]", user_id),
        ("allow_promotion_codes", "true".to_string()),
    ];

    match (&request.customer_id, &request.customer_email) {
        (Some(customer_id), _) => params.push(("customer", customer_id.clone())),
        (None, Some(email)) => params.push(("customer_email", email.clone())),
        (None, None) => {}
    }

    params
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Maps a non-success Stripe response to a `PaymentError`.
fn error_from_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<StripeErrorBody>(body).ok().map(|b| b.error);
    let message = detail
        .as_ref()
        .and_then(|d| d.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({})", status));

    let error = match status.as_u16() {
        401 | 403 => PaymentError::authentication(message),
        404 => PaymentError::new(PaymentErrorCode::NotFound, message),
        429 => PaymentError::new(PaymentErrorCode::RateLimitExceeded, message),
        400..=499 => PaymentError::invalid_request(message),
        _ => PaymentError::provider(message),
    };

    match detail.and_then(|d| d.code) {
        Some(code) => error.with_provider_code(code),
        None => error,
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, PaymentError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let error = error_from_response(status, &body);
    tracing::warn!(
        status = status.as_u16(),
        code = %error.code,
        provider_code = ?error.provider_code,
        "Stripe API request failed"
    );
    Err(error)
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let response = self
            .http_client
            .get(self.subscription_url(subscription_id))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        self.read_subscription(response).await
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let url = format!("{}/v1/checkout/sessions", self.config.api_base_url);
        let params = checkout_params(&request);

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let response = check_status(response).await?;
        let stripe_session: StripeCheckoutSession = response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = stripe_session
            .url
            .ok_or_else(|| PaymentError::provider("Checkout session has no URL"))?;

        Ok(CheckoutSession {
            id: stripe_session.id,
            url,
        })
    }

    async fn set_cancel_at_period_end(
        &self,
        subscription_id: &str,
        cancel: bool,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let flag = if cancel { "true" } else { "false" };
        let response = self
            .http_client
            .post(self.subscription_url(subscription_id))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&[("cancel_at_period_end", flag)])
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        self.read_subscription(response).await
    }
}
