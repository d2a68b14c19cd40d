//! CreateCheckoutSessionHandler - opens a hosted subscription checkout.

use std::sync::Arc;

use crate::domain::account::is_local_path;
use crate::domain::foundation::{AuthenticatedUser, UserId, ValidationError};
use crate::ports::{
    CatalogReader, CheckoutSession, CreateCheckoutRequest, PaymentProvider, ProfileRepository,
};

use super::BillingError;

/// Where checkout returns to when the caller names no page.
pub const DEFAULT_RETURN_PATH: &str = "/account";

#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionCommand {
    pub caller: AuthenticatedUser,
    /// The user the checkout is for, as sent by the browser.
    pub user_id: UserId,
    pub price_id: String,
    pub redirect_url: Option<String>,
}

pub struct CreateCheckoutSessionHandler {
    catalog: Arc<dyn CatalogReader>,
    profiles: Arc<dyn ProfileRepository>,
    payments: Arc<dyn PaymentProvider>,
    site_url: String,
}

impl CreateCheckoutSessionHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        profiles: Arc<dyn ProfileRepository>,
        payments: Arc<dyn PaymentProvider>,
        site_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            profiles,
            payments,
            site_url: site_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CheckoutSession, BillingError> {
        // 1. Callers may only buy for themselves
        if cmd.user_id != cmd.caller.id {
            tracing::warn!(caller = %cmd.caller.id, requested = %cmd.user_id, "Checkout for another user refused");
            return Err(BillingError::Forbidden);
        }

        // 2. Only active catalog prices can be purchased
        let price_id = cmd.price_id.trim();
        if price_id.is_empty() {
            return Err(ValidationError::empty_field("priceId").into());
        }
        let price = self
            .catalog
            .find_active_price(price_id)
            .await?
            .ok_or_else(|| BillingError::PriceNotFound(price_id.to_string()))?;

        let return_url = resolve_return_url(&self.site_url, cmd.redirect_url.as_deref())?;

        // 3. Reuse the processor customer when the profile already has one
        let customer_id = self
            .profiles
            .find_by_id(&cmd.caller.id)
            .await?
            .and_then(|p| p.stripe_customer_id);

        let session = self
            .payments
            .create_checkout_session(CreateCheckoutRequest {
                user_id: cmd.caller.id,
                price_id: price.id,
                customer_email: customer_id.is_none().then(|| cmd.caller.email.clone()),
                customer_id,
                success_url: with_query(&return_url, "checkout=success"),
                cancel_url: with_query(&return_url, "checkout=cancelled"),
            })
            .await?;

        tracing::info!(user_id = %cmd.caller.id, session_id = %session.id, "Checkout session created");
        Ok(session)
    }
}

/// Resolves the browser-supplied return location against the deployment URL.
///
/// Accepts a same-site path or an absolute URL under `site_url`; anything
/// else is refused so checkout cannot bounce users to another origin.
pub fn resolve_return_url(site_url: &str, redirect: Option<&str>) -> Result<String, ValidationError> {
    let base = site_url.trim_end_matches('/');
    let redirect = redirect.map(str::trim).filter(|r| !r.is_empty());

    match redirect {
        None => Ok(format!("{}{}", base, DEFAULT_RETURN_PATH)),
        Some(path) if is_local_path(path) => Ok(format!("{}{}", base, path)),
        Some(url)
            if url
                .strip_prefix(base)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?'])) =>
        {
            Ok(url.to_string())
        }
        Some(_) => Err(ValidationError::invalid_format(
            "redirectUrl",
            "must be a page on this site",
        )),
    }
}

fn with_query(url: &str, pair: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}", url, separator, pair)
}
