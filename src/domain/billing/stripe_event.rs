//! Stripe webhook and API objects, trimmed to the fields reconciliation
//! reads. Unknown fields are ignored.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::Timestamp;

use super::{SubscriptionSnapshot, SubscriptionStatus};

/// The outer envelope every webhook delivery shares. `data.object` is
/// decoded later, once the event type says what it holds.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    /// Epoch seconds.
    pub created: i64,
    #[serde(default)]
    pub livemode: bool,
    pub data: EventPayload,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventPayload {
    pub object: serde_json::Value,
}

impl StripeEvent {
    /// Decodes `data.object` as `T`.
    pub fn object<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }

    #[cfg(test)]
    pub(crate) fn fixture(event_type: &str, object: serde_json::Value) -> Self {
        Self {
            id: "evt_fixture".to_string(),
            event_type: event_type.to_string(),
            created: chrono::Utc::now().timestamp(),
            livemode: false,
            data: EventPayload { object },
        }
    }
}

/// Customer object (`customer.created`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Checkout session object (`checkout.session.completed`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "expandable_id")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "expandable_id")]
    pub subscription: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Hosted checkout URL, present on freshly created sessions.
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCustomerDetails {
    #[serde(default)]
    pub email: Option<String>,
}

impl StripeCheckoutSession {
    pub fn is_subscription_mode(&self) -> bool {
        self.mode.as_deref() == Some("subscription")
    }

    /// The application user this session was opened for, if recorded.
    pub fn user_reference(&self) -> Option<&str> {
        self.client_reference_id
            .as_deref()
            .or_else(|| self.metadata.get("user_id").map(String::as_str))
            .filter(|s| !s.is_empty())
    }

    pub fn email(&self) -> Option<&str> {
        self.customer_email.as_deref().or_else(|| {
            self.customer_details
                .as_ref()
                .and_then(|d| d.email.as_deref())
        })
    }
}

/// Subscription object (`customer.subscription.*` and API lookups).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    pub id: String,
    #[serde(deserialize_with = "required_expandable_id")]
    pub customer: String,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub price: Option<StripePriceRef>,
    /// Newer API versions report the period per item.
    #[serde(default)]
    pub current_period_start: Option<i64>,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePriceRef {
    pub id: String,
}

impl StripeSubscription {
    /// Converts the processor object into the processor-neutral snapshot.
    ///
    /// Period bounds come from the subscription itself, falling back to the
    /// first item when the API version moved them there.
    pub fn to_snapshot(&self) -> SubscriptionSnapshot {
        let first_item = self.items.data.first();
        let period_start = self
            .current_period_start
            .or_else(|| first_item.and_then(|i| i.current_period_start));
        let period_end = self
            .current_period_end
            .or_else(|| first_item.and_then(|i| i.current_period_end));

        SubscriptionSnapshot {
            subscription_id: self.id.clone(),
            customer_id: self.customer.clone(),
            status: self.status,
            plan_id: first_item.and_then(|i| i.price.as_ref()).map(|p| p.id.clone()),
            current_period_start: period_start.and_then(Timestamp::from_unix_secs),
            current_period_end: period_end.and_then(Timestamp::from_unix_secs),
            cancel_at_period_end: self.cancel_at_period_end,
        }
    }
}

/// Invoice object (`invoice.payment_*`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeInvoice {
    pub id: String,
    #[serde(default, deserialize_with = "expandable_id")]
    pub customer: Option<String>,
    #[serde(default, deserialize_with = "expandable_id")]
    pub subscription: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
}

/// Accepts either `"cus_123"` or an expanded `{ "id": "cus_123", ... }` object.
fn expandable_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(id)) => Some(id),
        Some(serde_json::Value::Object(map)) => map
            .get("id")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    })
}

fn required_expandable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    expandable_id(deserializer)?.ok_or_else(|| serde::de::Error::custom("missing object id"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_defaults_to_test_mode() {
        let event: StripeEvent = serde_json::from_str(
            r#"{"id":"evt_1","type":"customer.created","created":1704067200,"data":{"object":{"id":"cus_1"}}}"#,
        )
        .unwrap();

        assert!(!event.livemode);
        let customer: StripeCustomer = event.object().unwrap();
        assert_eq!(customer.id, "cus_1");
        assert!(customer.email.is_none());
    }

    #[test]
    fn subscription_snapshot_reads_top_level_period() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "active",
            "cancel_at_period_end": true,
            "current_period_start": 1704067200,
            "current_period_end": 1706745600,
            "items": { "data": [ { "price": { "id": "price_pro" } } ] }
        }))
        .unwrap();

        let snap = sub.to_snapshot();
        assert_eq!(snap.status, SubscriptionStatus::Active);
        assert_eq!(snap.plan_id.as_deref(), Some("price_pro"));
        assert_eq!(snap.current_period_end.unwrap().as_unix_secs(), 1706745600);
        assert!(snap.cancel_at_period_end);
    }

    #[test]
    fn subscription_snapshot_falls_back_to_first_item_period() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": { "id": "cus_expanded", "object": "customer" },
            "status": "trialing",
            "items": { "data": [ {
                "price": { "id": "price_pro" },
                "current_period_start": 1704067200,
                "current_period_end": 1706745600
            } ] }
        }))
        .unwrap();

        let snap = sub.to_snapshot();
        assert_eq!(snap.customer_id, "cus_expanded");
        assert_eq!(snap.current_period_start.unwrap().as_unix_secs(), 1704067200);
        assert_eq!(snap.current_period_end.unwrap().as_unix_secs(), 1706745600);
    }

    #[test]
    fn checkout_session_user_reference_prefers_client_reference() {
        let session: StripeCheckoutSession = serde_json::from_value(json!({
            "id": "cs_1",
            "mode": "subscription",
            "client_reference_id": "ref-user",
            "metadata": { "user_id": "meta-user" }
        }))
        .unwrap();

        assert!(session.is_subscription_mode());
        assert_eq!(session.user_reference(), Some("ref-user"));
    }

    #[test]
    fn checkout_session_email_falls_back_to_customer_details() {
        let session: StripeCheckoutSession = serde_json::from_value(json!({
            "id": "cs_1",
            "mode": "payment",
            "customer_details": { "email": "pm@fund.example" }
        }))
        .unwrap();

        assert!(!session.is_subscription_mode());
        assert_eq!(session.email(), Some("pm@fund.example"));
    }

    #[test]
    fn invoice_accepts_null_customer() {
        let invoice: StripeInvoice =
            serde_json::from_value(json!({ "id": "in_1", "customer": null })).unwrap();
        assert!(invoice.customer.is_none());
    }
}
