//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::dialogue::MenuDialogue;
use crate::dispatcher::{MenuDispatcher, UserIdentity};
use crate::localization::t;
use crate::navigation::{Command, NavEvent};
use crate::notifier::TelegramNotifier;

use super::dialogue_manager::handle_navigation;

/// Handle `/start`, `/help` and `/about`
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: MenuDialogue,
    dispatcher: Arc<MenuDispatcher>,
    notifier: TelegramNotifier,
) -> Result<()> {
    debug!(user_id = %msg.chat.id, command = ?cmd, "Received command");

    let Some(user) = msg.from.as_ref().map(UserIdentity::from) else {
        debug!(chat_id = %msg.chat.id, "Command without sender ignored");
        return Ok(());
    };

    handle_navigation(
        &bot,
        &dialogue,
        &dispatcher,
        &notifier,
        &NavEvent::from(cmd),
        &user,
    )
    .await
}

/// Anything that is not a command gets a pointer to the catalog
pub async fn message_handler(bot: Bot, msg: Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, has_text = msg.text().is_some(), "Received non-command message");
    bot.send_message(msg.chat.id, t("text-hint")).await?;
    Ok(())
}
