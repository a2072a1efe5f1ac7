//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::dialogue::MenuDialogue;
use crate::dispatcher::{MenuDispatcher, UserIdentity};
use crate::navigation::NavEvent;
use crate::notifier::TelegramNotifier;

use super::dialogue_manager::handle_navigation;

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: CallbackQuery,
    dialogue: MenuDialogue,
    dispatcher: Arc<MenuDispatcher>,
    notifier: TelegramNotifier,
) -> Result<()> {
    let data = q.data.as_deref().unwrap_or("");
    debug!(user_id = %q.from.id, data = data, "Received callback query from user");

    // Answer first so the client stops showing the loading state
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        error!(user_id = %q.from.id, error = %e, "Failed to answer callback query");
    }

    let event = NavEvent::from_tag(data);
    let user = UserIdentity::from(&q.from);

    handle_navigation(&bot, &dialogue, &dispatcher, &notifier, &event, &user).await
}
