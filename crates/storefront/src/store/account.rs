//! Order history and contact inquiries.

use std::sync::atomic::Ordering;

use secrecy::SecretString;
use tracing::{debug, instrument, warn};

use super::ShopStore;
use crate::error::{Result, StoreError};
use crate::models::{ContactForm, Inquiry, Order};

const INQUIRY_SENT: &str = "Message sent";

impl ShopStore {
    fn require_token(&self, operation: &str) -> Result<SecretString> {
        self.token()
            .ok_or_else(|| self.surface(operation, StoreError::NotAuthenticated))
    }

    /// The shopper's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` for a guest (show the login view) or the
    /// backend failure.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<Order>> {
        let token = self.require_token("order_history")?;
        let mut orders = self
            .backend()
            .user_orders(&token)
            .await
            .map_err(|e| self.surface("order_history", e.into()))?;
        orders.reverse();
        Ok(orders)
    }

    /// Send the contact form. Signed-in shoppers have it linked to their
    /// account.
    ///
    /// # Errors
    ///
    /// Returns `InvalidForm` for missing fields (not notified) or the
    /// backend failure.
    #[instrument(skip_all, fields(subject = %form.subject))]
    pub async fn submit_inquiry(&self, form: &ContactForm) -> Result<()> {
        form.validate()?;
        let token = self.token();
        let message = self
            .backend()
            .submit_inquiry(token.as_ref(), form)
            .await
            .map_err(|e| self.surface("submit_inquiry", e.into()))?;
        self.notifications()
            .success(message.unwrap_or_else(|| INQUIRY_SENT.to_string()));
        Ok(())
    }

    /// The shopper's inquiries as fetched. Unread replies among them are
    /// marked read on the backend and the unread counter is reset.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthenticated` for a guest or the fetch failure. Failures
    /// to mark an inquiry read are only logged.
    #[instrument(skip(self))]
    pub async fn my_inquiries(&self) -> Result<Vec<Inquiry>> {
        let token = self.require_token("my_inquiries")?;
        let inquiries = self
            .backend()
            .user_inquiries(&token)
            .await
            .map_err(|e| self.surface("my_inquiries", e.into()))?;

        for inquiry in inquiries.iter().filter(|i| i.is_unread_reply()) {
            if let Err(e) = self.backend().mark_inquiry_read(&token, &inquiry.id).await {
                warn!(inquiry_id = %inquiry.id, error = %e, "Could not mark inquiry read");
            }
        }
        self.inner.unread_replies.store(0, Ordering::Relaxed);

        Ok(inquiries)
    }

    /// Recount unread replies. Guests always have none; failures keep the
    /// previous count.
    pub async fn refresh_unread_replies(&self) -> usize {
        let Some(token) = self.token() else {
            self.inner.unread_replies.store(0, Ordering::Relaxed);
            return 0;
        };

        match self.backend().user_inquiries(&token).await {
            Ok(inquiries) => {
                let unread = inquiries.iter().filter(|i| i.is_unread_reply()).count();
                debug!(unread, "Unread replies refreshed");
                self.inner.unread_replies.store(unread, Ordering::Relaxed);
                unread
            }
            Err(e) => {
                warn!(error = %e, "Could not fetch unread replies");
                self.unread_replies()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use goshen_core::{InquiryId, InquiryStatus, OrderId, OrderStatus};
    use rust_decimal::Decimal;

    use super::*;
    use crate::api::mock::{MockBackend, PASSWORD};
    use crate::models::LoginForm;
    use crate::models::forms::DEFAULT_INQUIRY_SUBJECT;
    use crate::storage::MemoryStorage;
    use crate::store::tests::{catalog_mock, started};

    fn inquiry(id: &str, status: InquiryStatus, is_read: bool) -> Inquiry {
        Inquiry {
            id: InquiryId::new(id),
            subject: "Late delivery".to_string(),
            message: "Where is it?".to_string(),
            reply: (status == InquiryStatus::Replied).then(|| "On its way".to_string()),
            status,
            is_read,
            date: None,
        }
    }

    fn order(id: &str) -> Order {
        Order {
            id: OrderId::new(id),
            items: Vec::new(),
            amount: Decimal::new(30, 0),
            address: None,
            status: OrderStatus::Shipped,
            payment_method: None,
            payment_status: None,
            created_at: None,
        }
    }

    async fn signed_in(mock: &MockBackend) -> ShopStore {
        let store = started(mock, &MemoryStorage::new()).await;
        store
            .login(&LoginForm::new("ada@example.com", PASSWORD))
            .await
            .unwrap();
        store.notifications().drain();
        store
    }

    #[tokio::test]
    async fn test_order_history_requires_login() {
        let store = started(&catalog_mock(), &MemoryStorage::new()).await;
        let err = store.order_history().await.unwrap_err();
        assert!(matches!(err, StoreError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_order_history_newest_first() {
        let mock = catalog_mock();
        mock.state.lock().unwrap().orders = vec![order("o1"), order("o2"), order("o3")];
        let store = signed_in(&mock).await;

        let ids: Vec<_> = store
            .order_history()
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.id.into_inner())
            .collect();
        assert_eq!(ids, ["o3", "o2", "o1"]);
    }

    #[tokio::test]
    async fn test_guest_can_submit_inquiry() {
        let mock = catalog_mock();
        let store = started(&mock, &MemoryStorage::new()).await;
        let form = ContactForm::new("Ada", "ada@example.com", None, "Do you stock taro?");

        store.submit_inquiry(&form).await.unwrap();

        let submitted = mock.state.lock().unwrap().submitted.clone();
        assert_eq!(submitted[0].subject, DEFAULT_INQUIRY_SUBJECT);
        assert_eq!(store.notifications().drain()[0].message, "Message sent");
    }

    #[tokio::test]
    async fn test_blank_inquiry_is_not_sent() {
        let mock = catalog_mock();
        let store = started(&mock, &MemoryStorage::new()).await;
        let form = ContactForm::new("Ada", "ada@example.com", None, "  ");

        assert!(matches!(
            store.submit_inquiry(&form).await,
            Err(StoreError::InvalidForm(_))
        ));
        assert!(mock.state.lock().unwrap().submitted.is_empty());
    }

    #[tokio::test]
    async fn test_unread_replies_counted_on_login() {
        let mock = catalog_mock();
        mock.state.lock().unwrap().inquiries = vec![
            inquiry("i1", InquiryStatus::Replied, false),
            inquiry("i2", InquiryStatus::Replied, true),
            inquiry("i3", InquiryStatus::Pending, false),
        ];
        let store = signed_in(&mock).await;
        assert_eq!(store.unread_replies(), 1);
    }

    #[tokio::test]
    async fn test_my_inquiries_marks_unread_replies_read() {
        let mock = catalog_mock();
        mock.state.lock().unwrap().inquiries = vec![
            inquiry("i1", InquiryStatus::Replied, false),
            inquiry("i2", InquiryStatus::Pending, false),
            inquiry("i3", InquiryStatus::Replied, false),
        ];
        let store = signed_in(&mock).await;

        let inquiries = store.my_inquiries().await.unwrap();

        assert_eq!(inquiries.len(), 3);
        assert_eq!(
            mock.state.lock().unwrap().marked_read,
            vec![InquiryId::new("i1"), InquiryId::new("i3")]
        );
        assert_eq!(store.unread_replies(), 0);
        assert_eq!(store.refresh_unread_replies().await, 0);
    }

    #[tokio::test]
    async fn test_mark_read_failures_are_not_surfaced() {
        let mock = catalog_mock();
        {
            let mut state = mock.state.lock().unwrap();
            state.inquiries = vec![inquiry("i1", InquiryStatus::Replied, false)];
            state.fail_mark_read = true;
        }
        let store = signed_in(&mock).await;

        assert_eq!(store.my_inquiries().await.unwrap().len(), 1);
        assert!(store.notifications().is_empty());
    }
}
