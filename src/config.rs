//! # Configuration Module
//!
//! Process configuration read from environment variables. A missing bot
//! token or an unparseable admin id aborts startup.

use std::path::PathBuf;

use teloxide::types::ChatId;

use crate::errors::ConfigError;

pub const BOT_TOKEN_VAR: &str = "BOT_TOKEN";
pub const LEGACY_BOT_TOKEN_VAR: &str = "TELEGRAM_BOT_TOKEN";
pub const ADMIN_ID_VAR: &str = "ADMIN_ID";
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
pub const CATALOG_PATH_VAR: &str = "CATALOG_PATH";

/// Administrator settings used by the dispatcher and the notifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminConfig {
    /// Chat that receives order notifications
    pub chat_id: Option<ChatId>,
    /// Telegram handle without the leading `@`
    pub username: Option<String>,
}

/// Configuration structure for the bot process
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub admin: AdminConfig,
    /// Catalog file replacing the built-in catalog
    pub catalog_path: Option<PathBuf>,
}

impl BotConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = non_empty(BOT_TOKEN_VAR)
            .or_else(|| non_empty(LEGACY_BOT_TOKEN_VAR))
            .ok_or_else(|| ConfigError::Missing(BOT_TOKEN_VAR.to_string()))?;

        let chat_id = match non_empty(ADMIN_ID_VAR) {
            Some(value) => Some(ChatId(value.parse::<i64>().map_err(|_| {
                ConfigError::Invalid {
                    key: ADMIN_ID_VAR.to_string(),
                    value: value.clone(),
                }
            })?)),
            None => None,
        };

        let username = non_empty(ADMIN_USERNAME_VAR)
            .map(|handle| handle.trim_start_matches('@').to_string())
            .filter(|handle| !handle.is_empty());

        Ok(Self {
            bot_token,
            admin: AdminConfig { chat_id, username },
            catalog_path: non_empty(CATALOG_PATH_VAR).map(PathBuf::from),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = BotConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOT_TOKEN".to_string()));

        let err = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("BOT_TOKEN".to_string()));
    }

    #[test]
    fn test_legacy_token_variable() {
        let config = BotConfig::from_lookup(lookup(&[("TELEGRAM_BOT_TOKEN", "123:abc")])).unwrap();
        assert_eq!(config.bot_token, "123:abc");
    }

    #[test]
    fn test_full_configuration() {
        let config = BotConfig::from_lookup(lookup(&[
            ("BOT_TOKEN", "123:abc"),
            ("ADMIN_ID", "42"),
            ("ADMIN_USERNAME", "@shop_admin"),
            ("CATALOG_PATH", "/etc/bot/catalog.json"),
        ]))
        .unwrap();

        assert_eq!(config.admin.chat_id, Some(ChatId(42)));
        assert_eq!(config.admin.username.as_deref(), Some("shop_admin"));
        assert_eq!(
            config.catalog_path,
            Some(PathBuf::from("/etc/bot/catalog.json"))
        );
    }

    #[test]
    fn test_optional_admin_settings() {
        let config =
            BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "123:abc"), ("ADMIN_USERNAME", "@")]))
                .unwrap();
        assert_eq!(config.admin, AdminConfig::default());
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_invalid_admin_id() {
        let err = BotConfig::from_lookup(lookup(&[("BOT_TOKEN", "123:abc"), ("ADMIN_ID", "admin")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }
}
