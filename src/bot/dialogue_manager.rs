//! Dialogue Manager module for running one navigation event end to end

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

use crate::dialogue::MenuDialogue;
use crate::dispatcher::{MenuDispatcher, OrderNotification, Reply, UserIdentity};
use crate::navigation::NavEvent;
use crate::notifier::{deliver_notification, AdminNotifier};

use super::ui_builder::create_reply_keyboard;

/// Send a dispatcher reply to a chat
pub async fn send_reply(bot: &Bot, chat_id: ChatId, reply: &Reply) -> Result<()> {
    let request = bot.send_message(chat_id, reply.text.clone());
    match create_reply_keyboard(&reply.actions) {
        Some(keyboard) => request.reply_markup(keyboard).await?,
        None => request.await?,
    };
    Ok(())
}

/// Notify the admin about a completed order, then hand back the result of
/// sending the user's reply.
///
/// The deal code was already computed, so the admin hears about it even when
/// the reply to the user could not be delivered.
pub async fn finish_order<N: AdminNotifier>(
    notifier: &N,
    notification: Option<&OrderNotification>,
    sent: Result<()>,
) -> Result<()> {
    deliver_notification(notifier, notification).await;
    sent
}

/// Dispatch `event`, send the reply, store the next state and notify the admin.
///
/// The state only advances once the reply is sent. Notification failures are
/// logged and never reach the caller.
pub async fn handle_navigation<N: AdminNotifier>(
    bot: &Bot,
    dialogue: &MenuDialogue,
    dispatcher: &MenuDispatcher,
    notifier: &N,
    event: &NavEvent,
    user: &UserIdentity,
) -> Result<()> {
    let state = dialogue.get_or_default().await?;
    let outcome = dispatcher.dispatch(event, user, &state);

    let sent = send_reply(bot, dialogue.chat_id(), &outcome.reply).await;
    finish_order(notifier, outcome.notification.as_ref(), sent).await?;

    if outcome.next_state != state {
        debug!(user_id = %user.id, from = ?state, to = ?outcome.next_state, "Menu state transition");
        dialogue.update(outcome.next_state).await?;
    }

    Ok(())
}
