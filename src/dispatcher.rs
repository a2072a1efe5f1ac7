//! # Menu Dispatcher
//!
//! Turns one navigation event into one reply. The dispatcher is pure: it
//! reads the catalog and the caller's session state and returns the reply,
//! the next state and, when an order is placed, the notification to send.
//! Sending anything is left to the caller.
//!
//! # Flow
//!
//! - **Root**: greeting and one button per product
//! - **ProductView**: product rules with a plan picker or a confirm button
//! - **PlanOrConfirmView**: plan picker after the rules were accepted
//! - **Completed**: deal code and a way to reach the administrator
//!
//! Any tag that does not resolve against the catalog lands back on Root
//! with a "not found" notice.

use chrono::{DateTime, Utc};
use reqwest::Url;
use teloxide::types::{ChatId, User, UserId};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Plan, Product};
use crate::config::AdminConfig;
use crate::dialogue::MenuState;
use crate::localization::{t, t_args};
use crate::navigation::NavEvent;

/// A selectable action attached to a reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Re-enters the dispatcher with the given event
    Callback { label: String, event: NavEvent },
    /// Opens an external link
    Link { label: String, url: Url },
}

impl Action {
    fn callback(label: impl Into<String>, event: NavEvent) -> Self {
        Action::Callback {
            label: label.into(),
            event,
        }
    }

    pub fn event(&self) -> Option<&NavEvent> {
        match self {
            Action::Callback { event, .. } => Some(event),
            Action::Link { .. } => None,
        }
    }
}

/// Text plus rows of actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub actions: Vec<Vec<Action>>,
}

impl Reply {
    /// All actions, row by row
    pub fn all_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().flatten()
    }

    /// Whether any callback action carries `event`
    pub fn has_event(&self, event: &NavEvent) -> bool {
        self.all_actions().any(|action| action.event() == Some(event))
    }
}

/// Who sent the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: Option<String>,
    pub full_name: String,
}

impl From<&User> for UserIdentity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            full_name: user.full_name(),
        }
    }
}

impl UserIdentity {
    /// Human readable reference for the administrator
    pub fn display(&self) -> String {
        match &self.username {
            Some(username) => format!("{} (@{}, id {})", self.full_name, username, self.id),
            None => format!("{} (id {})", self.full_name, self.id),
        }
    }
}

/// Order details forwarded to the administrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderNotification {
    pub recipient: ChatId,
    pub user: UserIdentity,
    pub product_name: String,
    pub plan_name: String,
    pub deal_code: String,
    pub created_at: DateTime<Utc>,
}

impl OrderNotification {
    /// Message text sent to the administrator
    pub fn to_message(&self) -> String {
        let user = self.user.display();
        let time = self.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();
        t_args(
            "admin-order-notification",
            &[
                ("user", user.as_str()),
                ("product", self.product_name.as_str()),
                ("plan", self.plan_name.as_str()),
                ("code", self.deal_code.as_str()),
                ("time", time.as_str()),
            ],
        )
    }
}

/// Everything produced by one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub reply: Reply,
    pub next_state: MenuState,
    pub notification: Option<OrderNotification>,
}

impl Outcome {
    fn stay(reply: Reply, state: &MenuState) -> Self {
        Self {
            reply,
            next_state: state.clone(),
            notification: None,
        }
    }

    fn moved(reply: Reply, next_state: MenuState) -> Self {
        Self {
            reply,
            next_state,
            notification: None,
        }
    }
}

/// `https://t.me/<handle>` for a well-formed Telegram handle
fn admin_link(handle: &str) -> Option<Url> {
    if handle.is_empty() || !handle.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        warn!(handle = handle, "Admin handle is not a Telegram username, using contact fallback");
        return None;
    }
    match format!("https://t.me/{handle}").parse::<Url>() {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(handle = handle, error = %e, "Admin handle does not form a valid link");
            None
        }
    }
}

/// Catalog navigation for every user of the bot
#[derive(Debug, Clone)]
pub struct MenuDispatcher {
    catalog: Catalog,
    admin: AdminConfig,
    admin_link: Option<Url>,
}

impl MenuDispatcher {
    pub fn new(catalog: Catalog, admin: AdminConfig) -> Self {
        let admin_link = admin.username.as_deref().and_then(admin_link);

        Self {
            catalog,
            admin,
            admin_link,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Handle one navigation event for `user` whose session is in `state`
    pub fn dispatch(&self, event: &NavEvent, user: &UserIdentity, state: &MenuState) -> Outcome {
        debug!(user_id = %user.id, event = ?event, state = ?state, "Dispatching navigation event");

        match event {
            NavEvent::Menu => Outcome::moved(self.root_menu(), MenuState::Root),
            NavEvent::Help => Outcome::stay(self.static_page("help-text"), state),
            NavEvent::About => Outcome::stay(self.static_page("about-text"), state),
            NavEvent::Product { product } => match self.catalog.product(product) {
                Some(product) => self.product_view(product),
                None => self.not_found(user, event),
            },
            NavEvent::Confirm { product } => match self.catalog.product(product) {
                Some(product) => {
                    self.note_stale(user, state, &product.id);
                    self.confirm_view(product)
                }
                None => self.not_found(user, event),
            },
            NavEvent::Plan { product, plan } => match self.catalog.offer(product, plan) {
                Some((product, plan)) => {
                    self.note_stale(user, state, &product.id);
                    self.plan_chosen(user, product, plan)
                }
                None => self.not_found(user, event),
            },
            NavEvent::Contact { product, plan } => match self.catalog.offer(product, plan) {
                Some((product, plan)) => Outcome::stay(self.contact_view(product, plan), state),
                None => self.not_found(user, event),
            },
            NavEvent::Unknown(_) => self.not_found(user, event),
        }
    }

    /// Greeting with one button per product
    pub fn root_menu(&self) -> Reply {
        Reply {
            text: t("greeting"),
            actions: self.root_actions(),
        }
    }

    fn root_actions(&self) -> Vec<Vec<Action>> {
        let mut rows: Vec<Vec<Action>> = self
            .catalog
            .products
            .iter()
            .map(|product| vec![Action::callback(&product.name, NavEvent::product(&product.id))])
            .collect();
        rows.push(vec![
            Action::callback(t("help-button"), NavEvent::Help),
            Action::callback(t("about-button"), NavEvent::About),
        ]);
        rows
    }

    fn back_row() -> Vec<Action> {
        vec![Action::callback(t("back-button"), NavEvent::Menu)]
    }

    fn static_page(&self, key: &str) -> Reply {
        Reply {
            text: t(key),
            actions: vec![Self::back_row()],
        }
    }

    fn plan_rows(&self, product: &Product) -> Vec<Vec<Action>> {
        self.catalog
            .plans_for(product)
            .into_iter()
            .map(|plan| vec![Action::callback(&plan.label, NavEvent::plan(&product.id, &plan.id))])
            .collect()
    }

    fn product_view(&self, product: &Product) -> Outcome {
        let mut text = t_args(
            "product-view",
            &[
                ("name", product.name.as_str()),
                ("description", product.description.as_str()),
                ("rules", product.rules.as_str()),
            ],
        );

        let mut actions = if self.catalog.require_confirmation {
            vec![vec![Action::callback(
                t("confirm-button"),
                NavEvent::confirm(&product.id),
            )]]
        } else {
            text.push_str("\n\n");
            text.push_str(&t("choose-plan"));
            self.plan_rows(product)
        };
        actions.push(Self::back_row());

        Outcome::moved(
            Reply { text, actions },
            MenuState::ProductView {
                product: product.id.clone(),
            },
        )
    }

    fn confirm_view(&self, product: &Product) -> Outcome {
        let mut actions = self.plan_rows(product);
        actions.push(Self::back_row());

        Outcome::moved(
            Reply {
                text: t_args("confirm-prompt", &[("name", product.name.as_str())]),
                actions,
            },
            MenuState::PlanOrConfirmView {
                product: product.id.clone(),
            },
        )
    }

    fn plan_chosen(&self, user: &UserIdentity, product: &Product, plan: &Plan) -> Outcome {
        let code = self.catalog.deal_code(&product.id, &plan.id);
        info!(user_id = %user.id, product = %product.id, plan = %plan.id, deal_code = %code, "Order placed");

        let text = t_args(
            "order-summary",
            &[
                ("product", product.name.as_str()),
                ("plan", plan.name.as_str()),
                ("code", code.as_str()),
            ],
        );

        let notification = self.admin.chat_id.map(|recipient| OrderNotification {
            recipient,
            user: user.clone(),
            product_name: product.name.clone(),
            plan_name: plan.name.clone(),
            deal_code: code.clone(),
            created_at: Utc::now(),
        });

        Outcome {
            reply: Reply {
                text,
                actions: vec![vec![self.contact_action(product, plan)], Self::back_row()],
            },
            next_state: MenuState::Completed {
                product: product.id.clone(),
                plan: plan.id.clone(),
            },
            notification,
        }
    }

    /// Direct link when an admin handle is configured, otherwise the "get contact" callback
    fn contact_action(&self, product: &Product, plan: &Plan) -> Action {
        match &self.admin_link {
            Some(url) => Action::Link {
                label: t("contact-admin-button"),
                url: url.clone(),
            },
            None => Action::callback(
                t("get-contact-button"),
                NavEvent::contact(&product.id, &plan.id),
            ),
        }
    }

    fn contact_view(&self, product: &Product, plan: &Plan) -> Reply {
        let code = self.catalog.deal_code(&product.id, &plan.id);
        match (&self.admin.username, &self.admin_link) {
            (Some(handle), Some(url)) => Reply {
                text: t_args(
                    "contact-handle",
                    &[("code", code.as_str()), ("handle", handle.as_str())],
                ),
                actions: vec![
                    vec![Action::Link {
                        label: t("contact-admin-button"),
                        url: url.clone(),
                    }],
                    Self::back_row(),
                ],
            },
            // Only promise a callback when the administrator was actually notified
            _ if self.admin.chat_id.is_some() => Reply {
                text: t_args("contact-fallback", &[("code", code.as_str())]),
                actions: vec![Self::back_row()],
            },
            _ => Reply {
                text: t_args("contact-unavailable", &[("code", code.as_str())]),
                actions: vec![Self::back_row()],
            },
        }
    }

    fn not_found(&self, user: &UserIdentity, event: &NavEvent) -> Outcome {
        warn!(user_id = %user.id, tag = %event.to_tag(), "Selection does not resolve against the catalog");
        Outcome::moved(
            Reply {
                text: format!("{}\n\n{}", t("not-found"), t("greeting")),
                actions: self.root_actions(),
            },
            MenuState::Root,
        )
    }

    fn note_stale(&self, user: &UserIdentity, state: &MenuState, product: &str) {
        if let Some(selected) = state.selected_product() {
            if selected != product {
                debug!(user_id = %user.id, selected = selected, product = product, "Button from an earlier selection");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserIdentity {
        UserIdentity {
            id: UserId(7),
            username: Some("buyer".to_string()),
            full_name: "Jo Buyer".to_string(),
        }
    }

    fn dispatcher(admin: AdminConfig) -> MenuDispatcher {
        MenuDispatcher::new(Catalog::builtin().unwrap(), admin)
    }

    #[test]
    fn test_root_menu_lists_every_product() {
        let dispatcher = dispatcher(AdminConfig::default());
        let reply = dispatcher.root_menu();
        for product in &dispatcher.catalog().products {
            assert!(reply.has_event(&NavEvent::product(&product.id)));
        }
        assert!(reply.has_event(&NavEvent::Help));
        assert!(reply.has_event(&NavEvent::About));
    }

    #[test]
    fn test_help_keeps_state() {
        let dispatcher = dispatcher(AdminConfig::default());
        let state = MenuState::ProductView {
            product: "canva_pro".to_string(),
        };
        let outcome = dispatcher.dispatch(&NavEvent::Help, &user(), &state);
        assert_eq!(outcome.next_state, state);
        assert!(outcome.reply.has_event(&NavEvent::Menu));
    }

    #[test]
    fn test_user_display() {
        assert_eq!(user().display(), "Jo Buyer (@buyer, id 7)");
        let anonymous = UserIdentity {
            username: None,
            ..user()
        };
        assert_eq!(anonymous.display(), "Jo Buyer (id 7)");
    }

    #[test]
    fn test_invalid_admin_handle_falls_back_to_callback() {
        let dispatcher = dispatcher(AdminConfig {
            chat_id: None,
            username: Some("shop admin".to_string()),
        });
        let outcome = dispatcher.dispatch(
            &NavEvent::plan("canva_pro", "year"),
            &user(),
            &MenuState::Root,
        );
        assert!(outcome
            .reply
            .has_event(&NavEvent::contact("canva_pro", "year")));
    }

    #[test]
    fn test_admin_link() {
        assert_eq!(
            admin_link("shop_admin").map(|url| url.to_string()),
            Some("https://t.me/shop_admin".to_string())
        );
        assert!(admin_link("shop/admin").is_none());
        assert!(admin_link("").is_none());
    }

    #[test]
    fn test_empty_admin_handle_uses_contact_callback() {
        let dispatcher = dispatcher(AdminConfig {
            chat_id: None,
            username: Some(String::new()),
        });
        let outcome = dispatcher.dispatch(
            &NavEvent::plan("canva_pro", "year"),
            &user(),
            &MenuState::Root,
        );
        assert!(outcome
            .reply
            .all_actions()
            .all(|action| matches!(action, Action::Callback { .. })));
    }
}
