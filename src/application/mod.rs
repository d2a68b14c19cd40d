//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write (profile, request logs, processor state); query
//! handlers only read.

pub mod handlers;

pub use handlers::account::{
    AccountError, RequestPasswordResetCommand, RequestPasswordResetHandler, ResetPasswordCommand,
    ResetPasswordHandler, SignInCommand, SignInHandler, SignInResult, SignOutCommand,
    SignOutHandler, SignUpCommand, SignUpHandler, SignUpResult,
};
pub use handlers::billing::{
    HandleBillingWebhookCommand, HandleBillingWebhookHandler, HandleBillingWebhookResult,
};
pub use handlers::catalog::{GetPricingHandler, GetPricingQuery};
pub use handlers::entitlement::{CheckEntitlementHandler, CheckEntitlementQuery};
pub use handlers::privacy::{
    ExportDataCommand, ExportDataHandler, GetPrivacyDashboardHandler, GetPrivacyDashboardQuery,
    PrivacyDashboard, RequestDeletionCommand, RequestDeletionHandler,
    UpdatePrivacyPreferencesCommand, UpdatePrivacyPreferencesHandler,
};
pub use handlers::reports::{ListReportsHandler, ListReportsQuery};
pub use handlers::subscription::{
    BillingError, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    ManageSubscriptionCommand, ManageSubscriptionHandler, SubscriptionAction,
};
pub use handlers::waitlist::{
    JoinWaitlistCommand, JoinWaitlistHandler, ListWaitlistRequestsHandler,
    ListWaitlistRequestsQuery,
};
