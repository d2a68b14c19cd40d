//! Shared application state for the HTTP layer.

use std::sync::Arc;

use crate::application::handlers::account::{
    RequestPasswordResetHandler, ResetPasswordHandler, SignInHandler, SignOutHandler,
    SignUpHandler,
};
use crate::application::handlers::billing::HandleBillingWebhookHandler;
use crate::application::handlers::catalog::GetPricingHandler;
use crate::application::handlers::entitlement::CheckEntitlementHandler;
use crate::application::handlers::privacy::{
    ExportDataHandler, GetPrivacyDashboardHandler, RequestDeletionHandler,
    UpdatePrivacyPreferencesHandler,
};
use crate::application::handlers::reports::ListReportsHandler;
use crate::application::handlers::subscription::{
    CreateCheckoutSessionHandler, ManageSubscriptionHandler,
};
use crate::application::handlers::waitlist::{JoinWaitlistHandler, ListWaitlistRequestsHandler};
use crate::domain::billing::StripeWebhookVerifier;
use crate::ports::{
    CatalogReader, IdentityProvider, PaymentProvider, PrivacyRequestRepository,
    ProfileRepository, ReportReader, SessionValidator, WaitlistRepository,
};

use super::middleware::AuthState;

/// Ports and settings shared by every request.
///
/// Cloned per request; everything heavy sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub privacy_requests: Arc<dyn PrivacyRequestRepository>,
    pub waitlist: Arc<dyn WaitlistRepository>,
    pub reports: Arc<dyn ReportReader>,
    pub catalog: Arc<dyn CatalogReader>,
    pub payments: Arc<dyn PaymentProvider>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<dyn SessionValidator>,
    webhook: Arc<HandleBillingWebhookHandler>,
    /// Public base URL of the deployment, without a trailing slash.
    pub site_url: String,
    pub secure_cookies: bool,
}

/// Deployment settings the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub site_url: String,
    pub secure_cookies: bool,
    pub require_livemode: bool,
}

/// Port implementations handed to [`AppState::new`].
#[derive(Clone)]
pub struct Ports {
    pub profiles: Arc<dyn ProfileRepository>,
    pub privacy_requests: Arc<dyn PrivacyRequestRepository>,
    pub waitlist: Arc<dyn WaitlistRepository>,
    pub reports: Arc<dyn ReportReader>,
    pub catalog: Arc<dyn CatalogReader>,
    pub payments: Arc<dyn PaymentProvider>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sessions: Arc<dyn SessionValidator>,
}

impl AppState {
    pub fn new(ports: Ports, verifier: StripeWebhookVerifier, settings: HttpSettings) -> Self {
        let webhook = HandleBillingWebhookHandler::new(
            ports.profiles.clone(),
            ports.payments.clone(),
            verifier,
        )
        .require_livemode(settings.require_livemode);

        Self {
            profiles: ports.profiles,
            privacy_requests: ports.privacy_requests,
            waitlist: ports.waitlist,
            reports: ports.reports,
            catalog: ports.catalog,
            payments: ports.payments,
            identity: ports.identity,
            sessions: ports.sessions,
            webhook: Arc::new(webhook),
            site_url: settings.site_url.trim_end_matches('/').to_string(),
            secure_cookies: settings.secure_cookies,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            validator: self.sessions.clone(),
            identity: self.identity.clone(),
            secure_cookies: self.secure_cookies,
        }
    }

    /// Absolute URL for a same-site path.
    pub fn site_link(&self, path: &str) -> String {
        format!("{}{}", self.site_url, path)
    }

    // Account

    pub fn sign_up_handler(&self) -> SignUpHandler {
        SignUpHandler::new(self.identity.clone(), self.profiles.clone())
    }

    pub fn sign_in_handler(&self) -> SignInHandler {
        SignInHandler::new(self.identity.clone())
    }

    pub fn sign_out_handler(&self) -> SignOutHandler {
        SignOutHandler::new(self.identity.clone())
    }

    pub fn request_password_reset_handler(&self) -> RequestPasswordResetHandler {
        RequestPasswordResetHandler::new(self.identity.clone())
    }

    pub fn reset_password_handler(&self) -> ResetPasswordHandler {
        ResetPasswordHandler::new(self.identity.clone())
    }

    // Billing

    pub fn webhook_handler(&self) -> Arc<HandleBillingWebhookHandler> {
        self.webhook.clone()
    }

    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.catalog.clone(),
            self.profiles.clone(),
            self.payments.clone(),
            self.site_url.clone(),
        )
    }

    pub fn manage_subscription_handler(&self) -> ManageSubscriptionHandler {
        ManageSubscriptionHandler::new(self.profiles.clone(), self.payments.clone())
    }

    pub fn pricing_handler(&self) -> GetPricingHandler {
        GetPricingHandler::new(self.catalog.clone())
    }

    pub fn entitlement_handler(&self) -> CheckEntitlementHandler {
        CheckEntitlementHandler::new(self.profiles.clone())
    }

    // Privacy

    pub fn update_preferences_handler(&self) -> UpdatePrivacyPreferencesHandler {
        UpdatePrivacyPreferencesHandler::new(self.profiles.clone(), self.privacy_requests.clone())
    }

    pub fn export_data_handler(&self) -> ExportDataHandler {
        ExportDataHandler::new(
            self.profiles.clone(),
            self.identity.clone(),
            self.privacy_requests.clone(),
            self.waitlist.clone(),
        )
    }

    pub fn request_deletion_handler(&self) -> RequestDeletionHandler {
        RequestDeletionHandler::new(self.privacy_requests.clone())
    }

    pub fn privacy_dashboard_handler(&self) -> GetPrivacyDashboardHandler {
        GetPrivacyDashboardHandler::new(self.profiles.clone(), self.privacy_requests.clone())
    }

    // Waitlist and reports

    pub fn join_waitlist_handler(&self) -> JoinWaitlistHandler {
        JoinWaitlistHandler::new(self.profiles.clone(), self.waitlist.clone())
    }

    pub fn list_waitlist_handler(&self) -> ListWaitlistRequestsHandler {
        ListWaitlistRequestsHandler::new(self.waitlist.clone())
    }

    pub fn list_reports_handler(&self) -> ListReportsHandler {
        ListReportsHandler::new(self.reports.clone())
    }
}
