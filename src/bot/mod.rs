//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: Handles slash commands and other incoming messages
//! - `callback_handler`: Handles inline keyboard callback queries
//! - `ui_builder`: Creates keyboards from dispatcher replies
//! - `dialogue_manager`: Runs one navigation event and stores the next state

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use std::sync::Arc;

use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::dispatching::UpdateHandler;
use teloxide::dptree::di::DependencyMap;
use teloxide::prelude::*;
use teloxide::types::Chat;

use crate::dialogue::MenuState;
use crate::dispatcher::MenuDispatcher;
use crate::navigation::Command;
use crate::notifier::TelegramNotifier;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::{command_handler, message_handler};

// Re-export utility functions that might be used elsewhere
pub use dialogue_manager::{finish_order, handle_navigation, send_reply};
pub use ui_builder::{action_button, create_reply_keyboard};

/// The menu only runs in one-to-one chats; group updates are dropped
pub fn accepts_chat(chat: &Chat) -> bool {
    chat.is_private()
}

/// Callbacks whose message is gone entirely carry no chat and are dropped too
pub fn accepts_callback(query: &CallbackQuery) -> bool {
    query
        .message
        .as_ref()
        .is_some_and(|message| accepts_chat(message.chat()))
}

/// Handler tree shared by the binary and anything embedding the bot
pub fn schema() -> UpdateHandler<anyhow::Error> {
    let messages = Update::filter_message()
        .filter(|msg: Message| accepts_chat(&msg.chat))
        .enter_dialogue::<Message, InMemStorage<MenuState>, MenuState>()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(command_handler),
        )
        .branch(dptree::endpoint(message_handler));

    let callbacks = Update::filter_callback_query()
        .filter(|query: CallbackQuery| accepts_callback(&query))
        .enter_dialogue::<CallbackQuery, InMemStorage<MenuState>, MenuState>()
        .endpoint(callback_handler);

    dptree::entry().branch(messages).branch(callbacks)
}

/// Dependencies the handler tree expects to find
pub fn dependencies(
    dispatcher: Arc<MenuDispatcher>,
    notifier: TelegramNotifier,
) -> DependencyMap {
    dptree::deps![InMemStorage::<MenuState>::new(), dispatcher, notifier]
}
