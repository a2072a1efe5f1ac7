//! Menu dialogue module holding the per-user navigation state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Where a user is in the catalog flow.
///
/// Only the last selected product survives between events; the storage is
/// in-memory and scoped to the chat.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuState {
    #[default]
    Root,
    ProductView {
        product: String,
    },
    PlanOrConfirmView {
        product: String,
    },
    Completed {
        product: String,
        plan: String,
    },
}

impl MenuState {
    /// The product the user picked most recently, if any
    pub fn selected_product(&self) -> Option<&str> {
        match self {
            MenuState::Root => None,
            MenuState::ProductView { product }
            | MenuState::PlanOrConfirmView { product }
            | MenuState::Completed { product, .. } => Some(product),
        }
    }
}

/// Type alias for our menu dialogue
pub type MenuDialogue = Dialogue<MenuState, InMemStorage<MenuState>>;
