//! In-memory stand-in for the payment processor.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::billing::SubscriptionSnapshot;
use crate::ports::{CheckoutSession, CreateCheckoutRequest, PaymentError, PaymentProvider};

/// Serves seeded subscriptions and records checkout requests.
///
/// Clones share state, so a test can keep one handle while the handler
/// under test owns another. Failures are injected per port method and
/// persist until cleared.
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    state: Arc<Mutex<Processor>>,
}

#[derive(Default)]
struct Processor {
    subscriptions: HashMap<String, SubscriptionSnapshot>,
    checkouts: Vec<CreateCheckoutRequest>,
    failures: HashMap<&'static str, PaymentError>,
    calls: Vec<&'static str>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn processor(&self) -> MutexGuard<'_, Processor> {
        // A panicking test thread must not wedge the others.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_subscription(&self, subscription: SubscriptionSnapshot) {
        self.processor()
            .subscriptions
            .insert(subscription.subscription_id.clone(), subscription);
    }

    /// The processor's current view of a subscription.
    pub fn subscription(&self, subscription_id: &str) -> Option<SubscriptionSnapshot> {
        self.processor().subscriptions.get(subscription_id).cloned()
    }

    /// Makes every later call to `method` fail with `error`.
    pub fn set_method_error(&self, method: &'static str, error: PaymentError) {
        self.processor().failures.insert(method, error);
    }

    pub fn clear_errors(&self) {
        self.processor().failures.clear();
    }

    pub fn checkout_requests(&self) -> Vec<CreateCheckoutRequest> {
        self.processor().checkouts.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.call_count(method) > 0
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.processor().calls.iter().filter(|m| **m == method).count()
    }

    /// Logs the call and returns the injected failure, if any.
    fn enter(&self, method: &'static str) -> Result<MutexGuard<'_, Processor>, PaymentError> {
        let mut processor = self.processor();
        processor.calls.push(method);
        if let Some(error) = processor.failures.get(method).cloned() {
            return Err(error);
        }
        Ok(processor)
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let processor = self.enter("get_subscription")?;
        processor
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Subscription"))
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let mut processor = self.enter("create_checkout_session")?;
        processor.checkouts.push(request);
        let id = format!("cs_test_{:04}", processor.checkouts.len());
        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
        })
    }

    async fn set_cancel_at_period_end(
        &self,
        subscription_id: &str,
        cancel: bool,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let mut processor = self.enter("set_cancel_at_period_end")?;
        let subscription = processor
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;
        subscription.cancel_at_period_end = cancel;
        Ok(subscription.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::SubscriptionStatus;
    use crate::domain::foundation::UserId;
    use crate::ports::PaymentErrorCode;

    fn seeded() -> MockPaymentProvider {
        let mock = MockPaymentProvider::new();
        mock.add_subscription(SubscriptionSnapshot {
            subscription_id: "sub_1".to_string(),
            customer_id: "cus_1".to_string(),
            status: SubscriptionStatus::Active,
            plan_id: Some("price_monthly".to_string()),
            current_period_start: None,
            current_period_end: None,
            cancel_at_period_end: false,
        });
        mock
    }

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let err = seeded().get_subscription("sub_missing").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NotFound);
    }

    #[tokio::test]
    async fn cancel_flag_is_visible_to_other_handles() {
        let mock = seeded();
        let handle = mock.clone();

        handle.set_cancel_at_period_end("sub_1", true).await.unwrap();

        assert!(mock.subscription("sub_1").unwrap().cancel_at_period_end);
        assert_eq!(mock.call_count("set_cancel_at_period_end"), 1);
    }

    #[tokio::test]
    async fn checkout_sessions_are_numbered() {
        let mock = MockPaymentProvider::new();
        let request = CreateCheckoutRequest {
            user_id: UserId::new(),
            price_id: "price_monthly".to_string(),
            customer_id: None,
            customer_email: Some("pm@fund.example".to_string()),
            success_url: "https://research.example/account".to_string(),
            cancel_url: "https://research.example/pricing".to_string(),
        };

        let first = mock.create_checkout_session(request.clone()).await.unwrap();
        let second = mock.create_checkout_session(request).await.unwrap();

        assert_eq!(first.id, "cs_test_0001");
        assert!(second.url.ends_with("cs_test_0002"));
        assert_eq!(mock.checkout_requests().len(), 2);
    }

    #[tokio::test]
    async fn injected_failure_persists_until_cleared() {
        let mock = seeded();
        mock.set_method_error("get_subscription", PaymentError::network("connection reset"));

        assert!(mock.get_subscription("sub_1").await.is_err());
        assert!(mock.get_subscription("sub_1").await.is_err());
        mock.clear_errors();
        assert!(mock.get_subscription("sub_1").await.is_ok());
        assert_eq!(mock.call_count("get_subscription"), 3);
    }
}
