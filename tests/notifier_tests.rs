//! # Notifier Tests
//!
//! Best-effort delivery of order notifications.

use anyhow::anyhow;
use catalog_bot::bot::finish_order;
use catalog_bot::catalog::Catalog;
use catalog_bot::config::AdminConfig;
use catalog_bot::dialogue::MenuState;
use catalog_bot::dispatcher::{MenuDispatcher, OrderNotification, UserIdentity};
use catalog_bot::errors::NotifyError;
use catalog_bot::navigation::NavEvent;
use catalog_bot::notifier::{deliver_notification, AdminNotifier, Delivery};
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use teloxide::types::{ChatId, UserId};

/// Records every message it is asked to send
#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl AdminNotifier for RecordingNotifier {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        self.sent
            .lock()
            .expect("lock poisoned")
            .push(notification.to_message());
        Ok(())
    }
}

/// Fails every delivery and counts attempts
#[derive(Default)]
struct FailingNotifier {
    attempts: AtomicUsize,
}

impl AdminNotifier for FailingNotifier {
    async fn notify(&self, _notification: &OrderNotification) -> Result<(), NotifyError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(NotifyError::Delivery("chat not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification() -> OrderNotification {
        OrderNotification {
            recipient: ChatId(555),
            user: UserIdentity {
                id: UserId(1001),
                username: Some("alice".to_string()),
                full_name: "Alice Smith".to_string(),
            },
            product_name: "Canva Pro".to_string(),
            plan_name: "Annual plan".to_string(),
            deal_code: "DEAL-canva_pro-year-2024".to_string(),
            created_at: Utc
                .with_ymd_and_hms(2024, 5, 1, 12, 30, 0)
                .single()
                .expect("valid timestamp"),
        }
    }

    #[test]
    fn test_notification_message() {
        let message = notification().to_message();
        assert!(message.contains("Alice Smith (@alice, id 1001)"));
        assert!(message.contains("Canva Pro"));
        assert!(message.contains("Annual plan"));
        assert!(message.contains("DEAL-canva_pro-year-2024"));
        assert!(message.contains("2024-05-01 12:30:00 UTC"));
    }

    #[tokio::test]
    async fn test_delivery_sent() {
        let notifier = RecordingNotifier::default();
        let delivery = deliver_notification(&notifier, Some(&notification())).await;

        assert_eq!(delivery, Delivery::Sent);
        assert_eq!(notifier.sent.lock().expect("lock poisoned").len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_skipped_without_notification() {
        let notifier = RecordingNotifier::default();
        let delivery = deliver_notification(&notifier, None).await;

        assert_eq!(delivery, Delivery::Skipped);
        assert!(notifier.sent.lock().expect("lock poisoned").is_empty());
    }

    #[tokio::test]
    async fn test_failure_attempted_once_and_swallowed() {
        let notifier = FailingNotifier::default();
        let delivery = deliver_notification(&notifier, Some(&notification())).await;

        assert_eq!(delivery, Delivery::Failed);
        assert_eq!(notifier.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_notification_leaves_reply_untouched() {
        let dispatcher = MenuDispatcher::new(
            Catalog::builtin().expect("builtin catalog"),
            AdminConfig {
                chat_id: Some(ChatId(555)),
                username: None,
            },
        );
        let user = notification().user;
        let outcome = dispatcher.dispatch(&NavEvent::plan("canva_pro", "year"), &user, &MenuState::Root);
        let reply_before = outcome.reply.clone();

        let notifier = FailingNotifier::default();
        let delivery = deliver_notification(&notifier, outcome.notification.as_ref()).await;

        assert_eq!(delivery, Delivery::Failed);
        assert_eq!(outcome.reply, reply_before);
        assert!(outcome.reply.text.contains("DEAL-canva_pro-year-2024"));
    }

    #[tokio::test]
    async fn test_admin_notified_when_reply_fails() {
        let notifier = RecordingNotifier::default();
        let order = notification();

        let result = finish_order(&notifier, Some(&order), Err(anyhow!("bot was blocked"))).await;

        assert!(result.is_err());
        let sent = notifier.sent.lock().expect("lock poisoned");
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("DEAL-canva_pro-year-2024"));
    }

    #[tokio::test]
    async fn test_finish_order_passes_success_through() {
        let notifier = RecordingNotifier::default();
        assert!(finish_order(&notifier, None, Ok(())).await.is_ok());
        assert!(notifier.sent.lock().expect("lock poisoned").is_empty());
    }
}
