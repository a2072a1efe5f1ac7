//! # Admin Notification Module
//!
//! Order notifications are a best-effort side effect. The notifier reports
//! failures as [`NotifyError`]; [`deliver_notification`] makes at most one
//! attempt, logs any failure and never lets it reach the user's flow.

use std::future::Future;

use teloxide::prelude::*;
use tracing::{error, info};

use crate::dispatcher::OrderNotification;
use crate::errors::NotifyError;

/// Sink for order notifications
pub trait AdminNotifier {
    fn notify(
        &self,
        notification: &OrderNotification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Sends notifications as Telegram messages to the administrator chat
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

impl AdminNotifier for TelegramNotifier {
    async fn notify(&self, notification: &OrderNotification) -> Result<(), NotifyError> {
        self.bot
            .send_message(notification.recipient, notification.to_message())
            .await?;
        Ok(())
    }
}

/// What happened to a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing to send, no administrator configured
    Skipped,
    Sent,
    /// Delivery failed and was logged
    Failed,
}

/// Attempt delivery once. Failures are logged and swallowed.
pub async fn deliver_notification<N: AdminNotifier>(
    notifier: &N,
    notification: Option<&OrderNotification>,
) -> Delivery {
    let Some(notification) = notification else {
        return Delivery::Skipped;
    };

    match notifier.notify(notification).await {
        Ok(()) => {
            info!(
                user_id = %notification.user.id,
                admin_chat = %notification.recipient,
                deal_code = %notification.deal_code,
                "Order notification delivered"
            );
            Delivery::Sent
        }
        Err(e) => {
            error!(
                user_id = %notification.user.id,
                admin_chat = %notification.recipient,
                deal_code = %notification.deal_code,
                error = %e,
                "Failed to deliver order notification"
            );
            Delivery::Failed
        }
    }
}
