//! The item catalog.
//!
//! The catalog is built once at startup and never mutated. It is either the
//! built-in list of four items or a JSON document with the same shape,
//! validated with the same rules.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, ItemId, Price};

/// Errors raised while building a [`Catalog`].
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    /// Two items share an id.
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
    /// An item has a price below zero.
    #[error("item {0} has a negative price")]
    NegativePrice(ItemId),
    /// Items are priced in more than one currency.
    #[error("item {id} is priced in {found:?}, catalog currency is {expected:?}")]
    MixedCurrency {
        id: ItemId,
        expected: CurrencyCode,
        found: CurrencyCode,
    },
    /// The catalog document could not be parsed.
    #[error("invalid catalog document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Icon shown on an item card.
///
/// Icons are plain data; the view layer decides how each variant is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemIcon {
    Feather,
    #[default]
    Package,
    Pickaxe,
    Zap,
}

impl ItemIcon {
    /// Stable name, used as the SVG symbol id in markup.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Feather => "feather",
            Self::Package => "package",
            Self::Pickaxe => "pickaxe",
            Self::Zap => "zap",
        }
    }
}

/// A catalog entry available for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub description: String,
    pub unit_price: Price,
    pub category: String,
    /// Path or URL of the item image.
    pub image: String,
    #[serde(default)]
    pub icon: ItemIcon,
}

/// The immutable, ordered list of items on sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
    currency: CurrencyCode,
}

impl Catalog {
    /// Build a catalog from a list of items.
    ///
    /// An empty list yields an empty catalog priced in the default currency.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] if ids repeat, a price is negative, or the
    /// items do not all share one currency.
    pub fn new(items: Vec<Item>) -> Result<Self, CatalogError> {
        let currency = items
            .first()
            .map(|item| item.unit_price.currency_code)
            .unwrap_or_default();

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
            if item.unit_price.is_negative() {
                return Err(CatalogError::NegativePrice(item.id.clone()));
            }
            if item.unit_price.currency_code != currency {
                return Err(CatalogError::MixedCurrency {
                    id: item.id.clone(),
                    expected: currency,
                    found: item.unit_price.currency_code,
                });
            }
        }

        Ok(Self { items, currency })
    }

    /// Parse a catalog from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed JSON (including invalid
    /// item ids), or any validation error from [`Catalog::new`].
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::new(items)
    }

    /// The built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        let items = builtin_items();
        let currency = CurrencyCode::EUR;
        Self { items, currency }
    }

    /// Look up an item by id.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    /// All items in display order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Currency every item is priced in.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_item(
    id: &'static str,
    name: &str,
    description: &str,
    cents: i64,
    category: &str,
    image: &str,
    icon: ItemIcon,
) -> Item {
    Item {
        // Literal ids below are valid slugs.
        id: ItemId::parse(id).unwrap_or_else(|_| unreachable!("invalid builtin id {id}")),
        name: name.to_owned(),
        description: description.to_owned(),
        unit_price: Price::new(Decimal::new(cents, 2), CurrencyCode::EUR),
        category: category.to_owned(),
        image: image.to_owned(),
        icon,
    }
}

fn builtin_items() -> Vec<Item> {
    vec![
        builtin_item(
            "elytra",
            "Elytra",
            "Rare wings that allow you to glide through the air with style and grace.",
            100,
            "Equipment",
            "/static/images/elytra.png",
            ItemIcon::Feather,
        ),
        builtin_item(
            "skeleton-spawner",
            "Skeleton Spawner",
            "Spawns skeletons for your mob farm or defense system.",
            25,
            "Spawners",
            "/static/images/skeleton-spawner.png",
            ItemIcon::Package,
        ),
        builtin_item(
            "sea-pickle-farm",
            "Sea Pickle Farm (150 modules)",
            "Complete underwater farm setup with 150 sea pickle modules for lighting.",
            350,
            "Farms",
            "/static/images/sea-pickle-farm.jpg",
            ItemIcon::Pickaxe,
        ),
        builtin_item(
            "krypton-client",
            "Krypton Client",
            "Advanced Minecraft client with performance optimizations and features.",
            200,
            "Software",
            "/static/images/krypton-client.jpg",
            ItemIcon::Zap,
        ),
    ]
}
