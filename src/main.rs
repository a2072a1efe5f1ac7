use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use catalog_bot::bot::{dependencies, schema};
use catalog_bot::catalog::Catalog;
use catalog_bot::config::BotConfig;
use catalog_bot::dispatcher::MenuDispatcher;
use catalog_bot::localization::init_localization;
use catalog_bot::navigation::Command;
use catalog_bot::notifier::TelegramNotifier;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Catalog Telegram Bot");

    let config = BotConfig::from_env()?;
    init_localization()?;

    let catalog = Catalog::load(config.catalog_path.as_deref())?;
    info!(
        products = catalog.products.len(),
        plans = catalog.plans.len(),
        "Catalog loaded"
    );

    if config.admin.chat_id.is_none() {
        info!("ADMIN_ID not set, order notifications are disabled");
    }
    if config.admin.username.is_none() {
        info!("ADMIN_USERNAME not set, users get the contact fallback");
    }

    let bot = Bot::new(config.bot_token.clone());

    if let Err(e) = bot.set_my_commands(Command::bot_commands()).await {
        error!(error = %e, "Failed to register bot commands");
    }

    let dispatcher = Arc::new(MenuDispatcher::new(catalog, config.admin.clone()));
    let notifier = TelegramNotifier::new(bot.clone());

    info!("Bot initialized, starting dispatcher");

    Dispatcher::builder(bot, schema())
        .dependencies(dependencies(dispatcher, notifier))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
