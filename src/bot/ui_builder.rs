//! UI Builder module for turning dispatcher replies into inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::dispatcher::Action;

/// Create an inline button for a single action
pub fn action_button(action: &Action) -> InlineKeyboardButton {
    match action {
        Action::Callback { label, event } => {
            InlineKeyboardButton::callback(label.clone(), event.to_tag())
        }
        Action::Link { label, url } => InlineKeyboardButton::url(label.clone(), url.clone()),
    }
}

/// Create the inline keyboard for a reply, `None` when there are no actions
pub fn create_reply_keyboard(actions: &[Vec<Action>]) -> Option<InlineKeyboardMarkup> {
    let rows: Vec<Vec<InlineKeyboardButton>> = actions
        .iter()
        .filter(|row| !row.is_empty())
        .map(|row| row.iter().map(action_button).collect())
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(rows))
    }
}
