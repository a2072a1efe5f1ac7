//! # Catalog Module
//!
//! Products and plans offered by the bot, loaded once at startup from JSON
//! and never mutated afterwards. The catalog also owns the deal code
//! function used to reconcile orders by hand.

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::CatalogError;
use crate::navigation::{NavEvent, MAX_TAG_LEN};

/// Catalog shipped with the binary
pub const BUILTIN_CATALOG: &str = include_str!("../catalog/default.json");

pub const DEFAULT_DEAL_PREFIX: &str = "DEAL";
pub const DEFAULT_DEAL_SUFFIX: u32 = 2024;

/// Identifiers are lowercase ASCII words so they never contain tag or deal code separators
pub const ID_PATTERN: &str = r"^[a-z0-9_]+$";

static ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ID_PATTERN).expect("Identifier pattern should be valid"));

/// A subscription period a product can be ordered for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    /// Button caption
    pub label: String,
    /// Name used in order summaries
    pub name: String,
}

/// A product shown in the catalog menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rules: String,
    /// Plan ids offered for this product; empty means every catalog plan
    #[serde(default)]
    pub plans: Vec<String>,
}

/// The full, validated product catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default = "default_deal_prefix")]
    pub deal_prefix: String,
    #[serde(default = "default_deal_suffix")]
    pub deal_suffix: u32,
    /// Ask the user to accept the product rules before showing plans
    #[serde(default)]
    pub require_confirmation: bool,
    pub plans: Vec<Plan>,
    pub products: Vec<Product>,
}

fn default_deal_prefix() -> String {
    DEFAULT_DEAL_PREFIX.to_string()
}

fn default_deal_suffix() -> u32 {
    DEFAULT_DEAL_SUFFIX
}

/// Build the deal code for a product and plan.
///
/// Pure concatenation of the prefix, product key, plan key and suffix.
/// Identifiers cannot contain `-`, so distinct pairs never collide.
pub fn deal_code(prefix: &str, product_id: &str, plan_id: &str, suffix: u32) -> String {
    format!("{prefix}-{product_id}-{plan_id}-{suffix}")
}

impl Catalog {
    /// Parse and validate a catalog from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading catalog from file");
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The catalog embedded in the binary
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Load from `path` when given, otherwise fall back to the built-in catalog
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Self::builtin(),
        }
    }

    /// Check every structural rule the dispatcher relies on
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.products.is_empty() {
            return Err(CatalogError::Empty("products"));
        }
        if self.plans.is_empty() {
            return Err(CatalogError::Empty("plans"));
        }

        let mut plan_ids = HashSet::new();
        for plan in &self.plans {
            check_id(&plan.id)?;
            check_text(&plan.id, "label", &plan.label)?;
            check_text(&plan.id, "name", &plan.name)?;
            if !plan_ids.insert(plan.id.as_str()) {
                return Err(CatalogError::DuplicateId(plan.id.clone()));
            }
        }

        let mut product_ids = HashSet::new();
        for product in &self.products {
            check_id(&product.id)?;
            check_text(&product.id, "name", &product.name)?;
            check_text(&product.id, "rules", &product.rules)?;
            if !product_ids.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
            for plan in &product.plans {
                if !plan_ids.contains(plan.as_str()) {
                    return Err(CatalogError::UnknownPlan {
                        product: product.id.clone(),
                        plan: plan.clone(),
                    });
                }
            }
            // `contact:` is the longest tag a product produces
            for plan in self.plans_for(product) {
                let tag = NavEvent::contact(&product.id, &plan.id).to_tag();
                if tag.len() > MAX_TAG_LEN {
                    return Err(CatalogError::TagTooLong(tag));
                }
            }
        }

        Ok(())
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.id == id)
    }

    pub fn plan(&self, id: &str) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.id == id)
    }

    /// Plans offered for a product, in the order the product lists them
    pub fn plans_for(&self, product: &Product) -> Vec<&Plan> {
        if product.plans.is_empty() {
            self.plans.iter().collect()
        } else {
            product.plans.iter().filter_map(|id| self.plan(id)).collect()
        }
    }

    /// Resolve a product and one of its offered plans
    pub fn offer(&self, product_id: &str, plan_id: &str) -> Option<(&Product, &Plan)> {
        let product = self.product(product_id)?;
        let plan = self
            .plans_for(product)
            .into_iter()
            .find(|plan| plan.id == plan_id)?;
        Some((product, plan))
    }

    /// Deal code for a product and plan using this catalog's prefix and suffix
    pub fn deal_code(&self, product_id: &str, plan_id: &str) -> String {
        deal_code(&self.deal_prefix, product_id, plan_id, self.deal_suffix)
    }
}

fn check_id(id: &str) -> Result<(), CatalogError> {
    if ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(CatalogError::InvalidId(id.to_string()))
    }
}

/// Telegram rejects buttons and messages without visible text
fn check_text(id: &str, field: &'static str, value: &str) -> Result<(), CatalogError> {
    if value.trim().is_empty() {
        Err(CatalogError::EmptyField {
            id: id.to_string(),
            field,
        })
    } else {
        Ok(())
    }
}
