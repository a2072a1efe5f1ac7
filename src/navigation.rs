//! Navigation events decoded from callback tags and slash commands.
//!
//! Callback tags are the strings carried by inline buttons. They are decoded
//! once at the boundary into [`NavEvent`] and never inspected as strings
//! past that point.

use teloxide::utils::command::BotCommands;

/// Telegram's limit for `callback_data`, in bytes
pub const MAX_TAG_LEN: usize = 64;

pub const TAG_MENU: &str = "menu";
pub const TAG_HELP: &str = "help";
pub const TAG_ABOUT: &str = "about";
pub const PREFIX_PRODUCT: &str = "prod";
pub const PREFIX_PLAN: &str = "plan";
pub const PREFIX_CONFIRM: &str = "confirm";
pub const PREFIX_CONTACT: &str = "contact";

/// Slash commands understood by the bot
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "These commands are supported:")]
pub enum Command {
    #[command(description = "show the product catalog.")]
    Start,
    #[command(description = "how ordering works.")]
    Help,
    #[command(description = "about this shop.")]
    About,
}

/// A navigation step requested by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavEvent {
    Menu,
    Help,
    About,
    Product { product: String },
    Confirm { product: String },
    Plan { product: String, plan: String },
    Contact { product: String, plan: String },
    /// Anything that does not parse as a known tag, kept for logging
    Unknown(String),
}

impl NavEvent {
    /// Decode a callback tag. Never fails: malformed tags become `Unknown`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            TAG_MENU => return NavEvent::Menu,
            TAG_HELP => return NavEvent::Help,
            TAG_ABOUT => return NavEvent::About,
            _ => {}
        }

        let unknown = || NavEvent::Unknown(tag.to_string());
        let Some((prefix, rest)) = tag.split_once(':') else {
            return unknown();
        };

        match prefix {
            PREFIX_PRODUCT => single_key(rest)
                .map(|product| NavEvent::Product { product })
                .unwrap_or_else(unknown),
            PREFIX_CONFIRM => single_key(rest)
                .map(|product| NavEvent::Confirm { product })
                .unwrap_or_else(unknown),
            PREFIX_PLAN => key_pair(rest)
                .map(|(product, plan)| NavEvent::Plan { product, plan })
                .unwrap_or_else(unknown),
            PREFIX_CONTACT => key_pair(rest)
                .map(|(product, plan)| NavEvent::Contact { product, plan })
                .unwrap_or_else(unknown),
            _ => unknown(),
        }
    }

    /// Encode the event back into its callback tag
    pub fn to_tag(&self) -> String {
        match self {
            NavEvent::Menu => TAG_MENU.to_string(),
            NavEvent::Help => TAG_HELP.to_string(),
            NavEvent::About => TAG_ABOUT.to_string(),
            NavEvent::Product { product } => format!("{PREFIX_PRODUCT}:{product}"),
            NavEvent::Confirm { product } => format!("{PREFIX_CONFIRM}:{product}"),
            NavEvent::Plan { product, plan } => format!("{PREFIX_PLAN}:{product}:{plan}"),
            NavEvent::Contact { product, plan } => format!("{PREFIX_CONTACT}:{product}:{plan}"),
            NavEvent::Unknown(raw) => raw.clone(),
        }
    }

    pub fn product(product: &str) -> Self {
        NavEvent::Product {
            product: product.to_string(),
        }
    }

    pub fn confirm(product: &str) -> Self {
        NavEvent::Confirm {
            product: product.to_string(),
        }
    }

    pub fn plan(product: &str, plan: &str) -> Self {
        NavEvent::Plan {
            product: product.to_string(),
            plan: plan.to_string(),
        }
    }

    pub fn contact(product: &str, plan: &str) -> Self {
        NavEvent::Contact {
            product: product.to_string(),
            plan: plan.to_string(),
        }
    }
}

impl From<Command> for NavEvent {
    fn from(command: Command) -> Self {
        match command {
            Command::Start => NavEvent::Menu,
            Command::Help => NavEvent::Help,
            Command::About => NavEvent::About,
        }
    }
}

fn single_key(rest: &str) -> Option<String> {
    if rest.is_empty() || rest.contains(':') {
        return None;
    }
    Some(rest.to_string())
}

fn key_pair(rest: &str) -> Option<(String, String)> {
    let (first, second) = rest.split_once(':')?;
    Some((single_key(first)?, single_key(second)?))
}
