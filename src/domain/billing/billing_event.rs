//! Typed billing events, one variant per handled event kind.

use crate::domain::foundation::UserId;

use super::stripe_event::{
    StripeCheckoutSession, StripeCustomer, StripeEvent, StripeInvoice, StripeSubscription,
};
use super::{SubscriptionSnapshot, WebhookError};

/// A verified webhook event, narrowed to what reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillingEvent {
    CustomerCreated {
        customer_id: String,
        email: Option<String>,
    },
    CheckoutCompleted {
        session_id: String,
        subscription_mode: bool,
        customer_id: Option<String>,
        subscription_id: Option<String>,
        user_id: Option<UserId>,
        email: Option<String>,
    },
    /// `customer.subscription.created` and `customer.subscription.updated`.
    SubscriptionChanged(SubscriptionSnapshot),
    SubscriptionDeleted {
        subscription_id: String,
        customer_id: String,
    },
    InvoicePaymentSucceeded {
        invoice_id: String,
        customer_id: String,
    },
    InvoicePaymentFailed {
        invoice_id: String,
        customer_id: String,
    },
    Unhandled {
        event_type: String,
    },
}

impl BillingEvent {
    /// Narrows a verified envelope into a typed event.
    ///
    /// # Errors
    ///
    /// `ParseError` when the object does not match the event type, and
    /// `MissingField` when a field needed to locate the profile is absent.
    pub fn from_stripe(event: &StripeEvent) -> Result<Self, WebhookError> {
        let parse_err = |e: serde_json::Error| WebhookError::ParseError(e.to_string());

        match event.event_type.as_str() {
            "customer.created" => {
                let customer: StripeCustomer = event.object().map_err(parse_err)?;
                Ok(BillingEvent::CustomerCreated {
                    customer_id: customer.id,
                    email: customer.email.filter(|e| !e.is_empty()),
                })
            }
            "checkout.session.completed" => {
                let session: StripeCheckoutSession =
                    event.object().map_err(parse_err)?;
                Ok(BillingEvent::CheckoutCompleted {
                    subscription_mode: session.is_subscription_mode(),
                    user_id: session
                        .user_reference()
                        .and_then(|raw| UserId::parse(raw).ok()),
                    email: session.email().map(str::to_string),
                    customer_id: session.customer,
                    subscription_id: session.subscription,
                    session_id: session.id,
                })
            }
            "customer.subscription.created" | "customer.subscription.updated" => {
                let sub: StripeSubscription = event.object().map_err(parse_err)?;
                Ok(BillingEvent::SubscriptionChanged(sub.to_snapshot()))
            }
            "customer.subscription.deleted" => {
                let sub: StripeSubscription = event.object().map_err(parse_err)?;
                Ok(BillingEvent::SubscriptionDeleted {
                    subscription_id: sub.id,
                    customer_id: sub.customer,
                })
            }
            "invoice.payment_succeeded" => {
                let invoice: StripeInvoice = event.object().map_err(parse_err)?;
                Ok(BillingEvent::InvoicePaymentSucceeded {
                    customer_id: invoice.customer.ok_or(WebhookError::MissingField("customer"))?,
                    invoice_id: invoice.id,
                })
            }
            "invoice.payment_failed" => {
                let invoice: StripeInvoice = event.object().map_err(parse_err)?;
                Ok(BillingEvent::InvoicePaymentFailed {
                    customer_id: invoice.customer.ok_or(WebhookError::MissingField("customer"))?,
                    invoice_id: invoice.id,
                })
            }
            other => Ok(BillingEvent::Unhandled {
                event_type: other.to_string(),
            }),
        }
    }
}
