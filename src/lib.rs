//! # Catalog Bot
//!
//! A Telegram bot that presents a product catalog, walks the user through
//! product rules and plan selection, hands out a deal code and notifies the
//! shop administrator about the order.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod dispatcher;
pub mod errors;
pub mod localization;
pub mod navigation;
pub mod notifier;
