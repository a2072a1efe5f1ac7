use anyhow::{anyhow, Result};
use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::error;
use unic_langid::LanguageIdentifier;

/// English messages embedded in the binary
pub const EN_MESSAGES: &str = include_str!("../locales/en/main.ftl");

/// Every key the bot renders; checked once at startup
pub const REQUIRED_KEYS: &[&str] = &[
    "greeting",
    "help-button",
    "about-button",
    "back-button",
    "help-text",
    "about-text",
    "product-view",
    "choose-plan",
    "confirm-button",
    "confirm-prompt",
    "order-summary",
    "contact-admin-button",
    "get-contact-button",
    "contact-fallback",
    "contact-handle",
    "contact-unavailable",
    "not-found",
    "text-hint",
    "admin-order-notification",
];

/// Localization manager for the catalog bot
pub struct LocalizationManager {
    bundle: FluentBundle<FluentResource>,
}

impl LocalizationManager {
    /// Create a new localization manager from the embedded English messages
    pub fn new() -> Result<Self> {
        Self::from_source(EN_MESSAGES)
    }

    /// Create a localization manager from Fluent source text
    pub fn from_source(source: &str) -> Result<Self> {
        let locale: LanguageIdentifier = "en".parse()?;
        let mut bundle = FluentBundle::new_concurrent(vec![locale]);
        // Telegram renders the Unicode isolation marks as garbage
        bundle.set_use_isolating(false);

        let resource = FluentResource::try_new(source.to_string())
            .map_err(|(_, errors)| anyhow!("Invalid Fluent resource: {errors:?}"))?;
        bundle
            .add_resource(resource)
            .map_err(|errors| anyhow!("Conflicting Fluent messages: {errors:?}"))?;

        Ok(Self { bundle })
    }

    /// Keys from [`REQUIRED_KEYS`] that have no value in the bundle
    pub fn missing_keys(&self) -> Vec<&'static str> {
        REQUIRED_KEYS
            .iter()
            .copied()
            .filter(|key| {
                self.bundle
                    .get_message(key)
                    .and_then(|msg| msg.value())
                    .is_none()
            })
            .collect()
    }

    /// Get a localized message
    pub fn get_message(&self, key: &str, args: Option<&HashMap<&str, &str>>) -> String {
        let msg = match self.bundle.get_message(key) {
            Some(msg) => msg,
            None => return format!("Missing translation: {}", key),
        };

        let pattern = match msg.value() {
            Some(pattern) => pattern,
            None => return format!("Missing value for key: {}", key),
        };

        let fluent_args = args.map(|args| {
            FluentArgs::from_iter(args.iter().map(|(k, v)| (*k, FluentValue::from(*v))))
        });

        let mut errors = vec![];
        let value = self
            .bundle
            .format_pattern(pattern, fluent_args.as_ref(), &mut errors);
        if !errors.is_empty() {
            error!(key = key, errors = ?errors, "Errors while formatting message");
        }

        value.into_owned()
    }

    /// Get a localized message with simple string arguments
    pub fn get_message_with_args(&self, key: &str, args: &[(&str, &str)]) -> String {
        let args_map: HashMap<&str, &str> = args.iter().cloned().collect();
        self.get_message(key, Some(&args_map))
    }
}

static LOCALIZATION_MANAGER: OnceLock<Option<LocalizationManager>> = OnceLock::new();

/// Initialize the global localization manager, failing if the embedded messages are broken
pub fn init_localization() -> Result<()> {
    let manager = get_localization_manager()
        .ok_or_else(|| anyhow!("Localization manager failed to initialize"))?;
    let missing = manager.missing_keys();
    if !missing.is_empty() {
        return Err(anyhow!("Missing translations: {}", missing.join(", ")));
    }
    Ok(())
}

/// Get the global localization manager
pub fn get_localization_manager() -> Option<&'static LocalizationManager> {
    LOCALIZATION_MANAGER
        .get_or_init(|| match LocalizationManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                error!(error = %e, "Failed to load localization");
                None
            }
        })
        .as_ref()
}

/// Convenience function to get a localized message
pub fn t(key: &str) -> String {
    match get_localization_manager() {
        Some(manager) => manager.get_message(key, None),
        None => format!("Missing translation: {}", key),
    }
}

/// Convenience function to get a localized message with arguments
pub fn t_args(key: &str, args: &[(&str, &str)]) -> String {
    match get_localization_manager() {
        Some(manager) => manager.get_message_with_args(key, args),
        None => format!("Missing translation: {}", key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_messages_complete() {
        let manager = LocalizationManager::new().unwrap();
        assert!(manager.missing_keys().is_empty());
    }

    #[test]
    fn test_no_isolation_marks() {
        let text = t_args("confirm-prompt", &[("name", "Canva Pro")]);
        assert_eq!(text, "Rules accepted for Canva Pro. Choose a plan:");
    }
}
