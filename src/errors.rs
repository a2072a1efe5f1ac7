//! # Error Types Module
//!
//! This module defines the error types used by the catalog bot.
//! Configuration and catalog errors are fatal at startup; notification
//! errors are recoverable and only ever logged.

/// Errors raised while reading the process configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    Missing(String),
    /// A variable is present but cannot be parsed
    Invalid { key: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "Missing configuration: {key} must be set"),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid configuration: {key}={value:?}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors raised while loading or validating a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Catalog file could not be read
    Io(String),
    /// Catalog JSON is malformed
    Parse(String),
    /// Catalog has no products or no plans
    Empty(&'static str),
    /// Identifier does not match the identifier grammar
    InvalidId(String),
    /// Identifier appears twice
    DuplicateId(String),
    /// Product offers a plan that is not defined
    UnknownPlan { product: String, plan: String },
    /// Text shown on a button or in a product view is blank
    EmptyField { id: String, field: &'static str },
    /// Generated callback tag exceeds the platform limit
    TagTooLong(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Io(msg) => write!(f, "Catalog read error: {msg}"),
            CatalogError::Parse(msg) => write!(f, "Catalog parse error: {msg}"),
            CatalogError::Empty(what) => write!(f, "Catalog has no {what}"),
            CatalogError::InvalidId(id) => write!(f, "Invalid catalog identifier: {id:?}"),
            CatalogError::DuplicateId(id) => write!(f, "Duplicate catalog identifier: {id}"),
            CatalogError::UnknownPlan { product, plan } => {
                write!(f, "Product {product} references unknown plan {plan}")
            }
            CatalogError::EmptyField { id, field } => {
                write!(f, "Catalog entry {id} has an empty {field}")
            }
            CatalogError::TagTooLong(tag) => write!(f, "Callback tag too long: {tag}"),
        }
    }
}

impl std::error::Error for CatalogError {}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Io(err.to_string())
    }
}

/// Errors raised while delivering an order notification
#[derive(Debug, Clone)]
pub enum NotifyError {
    /// The messaging platform rejected or failed the request
    Delivery(String),
}

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotifyError::Delivery(msg) => write!(f, "Notification delivery error: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}

impl From<teloxide::RequestError> for NotifyError {
    fn from(err: teloxide::RequestError) -> Self {
        NotifyError::Delivery(err.to_string())
    }
}
