//! Cart snapshots and the cart store.
//!
//! A [`Cart`] is an immutable snapshot: every change produces a new cart and
//! leaves the old one untouched. [`CartStore`] applies user intents against
//! the catalog and pairs each new snapshot with the [`CartEvent`] describing
//! it.
//!
//! # Invariants
//!
//! - At most one line per item id.
//! - Every line has quantity >= 1.
//! - Lines stay in the order their items were first added; re-adding an item
//!   only bumps its quantity.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Item};
use crate::notification::{CartEvent, CheckoutRejection, Notification};
use crate::types::{CurrencyCode, ItemId, Price};

/// Errors returned by cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The id is not in the catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),
    /// Incrementing the line would exceed `u32::MAX`.
    #[error("quantity limit reached for {0}")]
    QuantityOverflow(ItemId),
    /// The item is priced in a different currency than the cart.
    #[error("item {id} is priced in {item:?}, cart is in {cart:?}")]
    CurrencyMismatch {
        id: ItemId,
        cart: CurrencyCode,
        item: CurrencyCode,
    },
}

/// One distinct item in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    item: Item,
    quantity: u32,
}

impl CartLine {
    /// Snapshot of the item taken when it was first added.
    #[must_use]
    pub const fn item(&self) -> &Item {
        &self.item
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Unit price times quantity.
    ///
    /// Saturates at `Decimal::MAX` rather than failing; no real catalog price
    /// gets near it.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        let unit = self.item.unit_price;
        unit.times(self.quantity)
            .unwrap_or_else(|_| Price::new(Decimal::MAX, unit.currency_code))
    }
}

/// An ordered, immutable snapshot of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    currency: CurrencyCode,
}

impl Cart {
    /// An empty cart priced in `currency`.
    #[must_use]
    pub const fn new(currency: CurrencyCode) -> Self {
        Self {
            lines: Vec::new(),
            currency,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `id`, if the item is in the cart.
    #[must_use]
    pub fn line(&self, id: &ItemId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Sum of all line quantities. Zero for an empty cart.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of all line subtotals, exact in decimal. Zero for an empty cart.
    #[must_use]
    pub fn total_price(&self) -> Price {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .try_fold(Price::zero(self.currency), |total, subtotal| {
                total.checked_add(&subtotal)
            })
            .unwrap_or_else(|_| Price::new(Decimal::MAX, self.currency))
    }

    /// A new cart with `item` added: a fresh line with quantity 1 at the end,
    /// or the existing line's quantity plus one in place.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the line is already at
    /// `u32::MAX`, or [`CartError::CurrencyMismatch`] if the item is priced in
    /// another currency.
    pub fn with_added(&self, item: &Item) -> Result<Self, CartError> {
        if item.unit_price.currency_code != self.currency {
            return Err(CartError::CurrencyMismatch {
                id: item.id.clone(),
                cart: self.currency,
                item: item.unit_price.currency_code,
            });
        }

        let mut lines = self.lines.clone();
        match lines.iter_mut().find(|line| line.item.id == item.id) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(1)
                    .ok_or_else(|| CartError::QuantityOverflow(item.id.clone()))?;
            }
            None => lines.push(CartLine {
                item: item.clone(),
                quantity: 1,
            }),
        }

        Ok(Self {
            lines,
            currency: self.currency,
        })
    }

    /// A new cart without the line for `id`, and whether such a line existed.
    #[must_use]
    pub fn without(&self, id: &ItemId) -> (Self, bool) {
        let lines: Vec<CartLine> = self
            .lines
            .iter()
            .filter(|line| &line.item.id != id)
            .cloned()
            .collect();
        let removed = lines.len() != self.lines.len();
        (
            Self {
                lines,
                currency: self.currency,
            },
            removed,
        )
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(CurrencyCode::default())
    }
}

/// A new cart snapshot and the event that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub cart: Cart,
    pub event: CartEvent,
}

impl Transition {
    /// The notification to show for this transition.
    #[must_use]
    pub fn notification(&self) -> Notification {
        Notification::from(&self.event)
    }
}

/// Applies cart operations against the catalog.
///
/// Cheap to clone; the catalog is shared.
#[derive(Debug, Clone)]
pub struct CartStore {
    catalog: Arc<Catalog>,
}

impl CartStore {
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// An empty cart in the catalog's currency.
    #[must_use]
    pub fn empty_cart(&self) -> Cart {
        Cart::new(self.catalog.currency())
    }

    /// Add one unit of `item_id`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::UnknownItem`] if the id is not in the catalog,
    /// plus any error from [`Cart::with_added`].
    pub fn add(&self, cart: &Cart, item_id: &ItemId) -> Result<Transition, CartError> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or_else(|| CartError::UnknownItem(item_id.clone()))?;

        let cart = cart.with_added(item)?;
        let quantity = cart.line(item_id).map_or(0, CartLine::quantity);

        Ok(Transition {
            cart,
            event: CartEvent::ItemAdded {
                item_id: item_id.clone(),
                name: item.name.clone(),
                quantity,
            },
        })
    }

    /// Remove the whole line for `item_id`. Removing an absent id is a no-op.
    #[must_use]
    pub fn remove(&self, cart: &Cart, item_id: &ItemId) -> Transition {
        let (cart, was_present) = cart.without(item_id);
        Transition {
            cart,
            event: CartEvent::ItemRemoved {
                item_id: item_id.clone(),
                was_present,
            },
        }
    }

    /// Attempt checkout. The cart is returned unchanged either way.
    #[must_use]
    pub fn checkout(&self, cart: &Cart) -> Transition {
        let event = if cart.is_empty() {
            CartEvent::CheckoutRejected(CheckoutRejection::EmptyCart)
        } else {
            CartEvent::CheckoutAcknowledged {
                total_items: cart.total_items(),
                total_price: cart.total_price(),
            }
        };
        Transition {
            cart: cart.clone(),
            event,
        }
    }

    #[must_use]
    pub fn total_items(&self, cart: &Cart) -> u64 {
        cart.total_items()
    }

    #[must_use]
    pub fn total_price(&self, cart: &Cart) -> Price {
        cart.total_price()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::ItemIcon;
    use crate::notification::NotificationLevel;

    fn store() -> CartStore {
        CartStore::new(Arc::new(Catalog::builtin()))
    }

    fn id(s: &str) -> ItemId {
        ItemId::parse(s).unwrap()
    }

    fn eur(cents: i64) -> Price {
        Price::from_cents(cents, CurrencyCode::EUR)
    }

    fn line_ids(cart: &Cart) -> Vec<&str> {
        cart.lines().iter().map(|l| l.item().id.as_str()).collect()
    }

    fn add_all(store: &CartStore, ids: &[&str]) -> Cart {
        ids.iter().fold(store.empty_cart(), |cart, i| {
            store.add(&cart, &id(i)).unwrap().cart
        })
    }

    #[test]
    fn test_empty_cart_totals() {
        let store = store();
        let cart = store.empty_cart();
        assert!(cart.is_empty());
        assert_eq!(store.total_items(&cart), 0);
        assert_eq!(store.total_price(&cart), eur(0));
        assert_eq!(cart.total_price().display(), "€0.00");
    }

    #[test]
    fn test_add_n_times_yields_one_line_with_quantity_n() {
        let store = store();
        for item in store.catalog().items() {
            let mut cart = store.empty_cart();
            for n in 1..=5 {
                cart = store.add(&cart, &item.id).unwrap().cart;
                assert_eq!(cart.len(), 1);
                assert_eq!(cart.line(&item.id).unwrap().quantity(), n);
            }
        }
    }

    #[test]
    fn test_add_unknown_item_is_error() {
        let store = store();
        let cart = store.empty_cart();
        let result = store.add(&cart, &id("netherite-pickaxe"));
        assert_eq!(result, Err(CartError::UnknownItem(id("netherite-pickaxe"))));
    }

    #[test]
    fn test_add_does_not_mutate_previous_snapshot() {
        let store = store();
        let before = add_all(&store, &["elytra"]);
        let after = store.add(&before, &id("elytra")).unwrap().cart;
        assert_eq!(before.line(&id("elytra")).unwrap().quantity(), 1);
        assert_eq!(after.line(&id("elytra")).unwrap().quantity(), 2);
    }

    #[test]
    fn test_readd_keeps_first_added_position() {
        let store = store();
        let cart = add_all(
            &store,
            &["sea-pickle-farm", "elytra", "krypton-client", "sea-pickle-farm", "elytra"],
        );
        assert_eq!(
            line_ids(&cart),
            vec!["sea-pickle-farm", "elytra", "krypton-client"]
        );
        assert_eq!(cart.line(&id("sea-pickle-farm")).unwrap().quantity(), 2);
    }

    #[test]
    fn test_remove_leaves_other_lines_untouched() {
        let store = store();
        let cart = add_all(
            &store,
            &["elytra", "skeleton-spawner", "skeleton-spawner", "krypton-client"],
        );
        let transition = store.remove(&cart, &id("elytra"));
        let cart = transition.cart;
        assert!(cart.line(&id("elytra")).is_none());
        assert_eq!(line_ids(&cart), vec!["skeleton-spawner", "krypton-client"]);
        assert_eq!(cart.line(&id("skeleton-spawner")).unwrap().quantity(), 2);
        assert_eq!(cart.line(&id("krypton-client")).unwrap().quantity(), 1);
        assert!(matches!(
            transition.event,
            CartEvent::ItemRemoved {
                was_present: true,
                ..
            }
        ));
    }

    #[test]
    fn test_remove_whole_line_not_decrement() {
        let store = store();
        let cart = add_all(&store, &["elytra", "elytra", "elytra"]);
        let cart = store.remove(&cart, &id("elytra")).cart;
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop_with_success() {
        let store = store();
        let cart = add_all(&store, &["elytra"]);
        let transition = store.remove(&cart, &id("krypton-client"));
        assert_eq!(transition.cart, cart);
        assert_eq!(
            transition.event,
            CartEvent::ItemRemoved {
                item_id: id("krypton-client"),
                was_present: false,
            }
        );
        assert_eq!(transition.notification().level, NotificationLevel::Success);
    }

    #[test]
    fn test_totals_match_line_sums() {
        let store = store();
        let cart = add_all(
            &store,
            &[
                "skeleton-spawner",
                "skeleton-spawner",
                "skeleton-spawner",
                "sea-pickle-farm",
                "elytra",
            ],
        );
        let expected_items: u64 = cart.lines().iter().map(|l| u64::from(l.quantity())).sum();
        assert_eq!(cart.total_items(), expected_items);
        assert_eq!(cart.total_items(), 5);
        // 3 * 0.25 + 3.50 + 1.00
        assert_eq!(cart.total_price(), eur(525));
        assert_eq!(cart.line(&id("skeleton-spawner")).unwrap().subtotal(), eur(75));
    }

    #[test]
    fn test_many_cheap_lines_stay_exact() {
        let store = store();
        let mut cart = store.empty_cart();
        for _ in 0..1_000 {
            cart = store.add(&cart, &id("skeleton-spawner")).unwrap().cart;
        }
        assert_eq!(cart.total_price(), eur(25_000));
        assert_eq!(cart.total_price().display(), "€250.00");
    }

    #[test]
    fn test_elytra_krypton_scenario() {
        let store = store();
        let cart = store.empty_cart();

        let t = store.add(&cart, &id("elytra")).unwrap();
        assert_eq!(line_ids(&t.cart), vec!["elytra"]);
        assert_eq!(t.cart.line(&id("elytra")).unwrap().quantity(), 1);
        assert_eq!(t.cart.total_price(), eur(100));
        assert_eq!(t.notification().message, "Elytra added to cart!");

        let t = store.add(&t.cart, &id("elytra")).unwrap();
        assert_eq!(t.cart.line(&id("elytra")).unwrap().quantity(), 2);
        assert_eq!(t.cart.total_price(), eur(200));

        let t = store.add(&t.cart, &id("krypton-client")).unwrap();
        assert_eq!(t.cart.len(), 2);
        assert_eq!(t.cart.total_price(), eur(400));

        let t = store.remove(&t.cart, &id("elytra"));
        assert_eq!(line_ids(&t.cart), vec!["krypton-client"]);
        assert_eq!(t.cart.line(&id("krypton-client")).unwrap().quantity(), 1);
        assert_eq!(t.cart.total_price(), eur(200));
        assert_eq!(t.notification().message, "Item removed from cart");
    }

    #[test]
    fn test_checkout_empty_cart_rejected_and_unchanged() {
        let store = store();
        let cart = store.empty_cart();
        let t = store.checkout(&cart);
        assert_eq!(
            t.event,
            CartEvent::CheckoutRejected(CheckoutRejection::EmptyCart)
        );
        assert!(t.cart.is_empty());
        assert!(t.notification().is_error());
    }

    #[test]
    fn test_checkout_non_empty_acknowledged() {
        let store = store();
        let cart = add_all(&store, &["elytra", "krypton-client"]);
        let t = store.checkout(&cart);
        assert_eq!(
            t.event,
            CartEvent::CheckoutAcknowledged {
                total_items: 2,
                total_price: eur(300),
            }
        );
        assert_eq!(t.cart, cart);
        assert!(!t.notification().is_error());
    }

    #[test]
    fn test_add_rejects_other_currency() {
        let item = Item {
            id: id("dollar-item"),
            name: "Dollar Item".to_owned(),
            description: String::new(),
            unit_price: Price::from_cents(100, CurrencyCode::USD),
            category: String::new(),
            image: String::new(),
            icon: ItemIcon::Zap,
        };
        let cart = Cart::new(CurrencyCode::EUR);
        assert!(matches!(
            cart.with_added(&item),
            Err(CartError::CurrencyMismatch { .. })
        ));
    }

    #[test]
    fn test_quantity_overflow() {
        let item = Catalog::builtin().items()[0].clone();
        let cart = Cart {
            lines: vec![CartLine {
                item: item.clone(),
                quantity: u32::MAX,
            }],
            currency: CurrencyCode::EUR,
        };
        assert_eq!(
            cart.with_added(&item),
            Err(CartError::QuantityOverflow(item.id.clone()))
        );
    }

    #[test]
    fn test_cart_serde_roundtrip_preserves_order() {
        let store = store();
        let cart = add_all(&store, &["krypton-client", "elytra", "krypton-client"]);
        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(line_ids(&restored), vec!["krypton-client", "elytra"]);
    }
}
