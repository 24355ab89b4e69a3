//! Cart events and the notifications they produce.
//!
//! Cart operations report what happened as a [`CartEvent`]. Turning an event
//! into a user-facing [`Notification`] is a separate step, so the cart state
//! machine never depends on how (or whether) toasts are displayed.

use serde::{Deserialize, Serialize};

use crate::types::{ItemId, Price};

/// Why a checkout attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutRejection {
    /// The cart has no lines.
    EmptyCart,
}

/// Outcome of a single cart operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// An item was added, or its quantity incremented.
    ItemAdded {
        item_id: ItemId,
        name: String,
        /// Quantity of the line after the add.
        quantity: u32,
    },
    /// A line was removed. `was_present` is false when the id had no line.
    ItemRemoved { item_id: ItemId, was_present: bool },
    /// Checkout was refused.
    CheckoutRejected(CheckoutRejection),
    /// Checkout was accepted. Nothing is charged or submitted.
    CheckoutAcknowledged { total_items: u64, total_price: Price },
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

impl NotificationLevel {
    /// Lowercase name, used as a CSS modifier.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message shown to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

impl From<&CartEvent> for Notification {
    fn from(event: &CartEvent) -> Self {
        match event {
            CartEvent::ItemAdded { name, .. } => Self::success(format!("{name} added to cart!")),
            CartEvent::ItemRemoved { .. } => Self::success("Item removed from cart"),
            CartEvent::CheckoutRejected(CheckoutRejection::EmptyCart) => {
                Self::error("Your cart is empty!")
            }
            CartEvent::CheckoutAcknowledged { .. } => {
                Self::success("Checkout functionality coming soon!")
            }
        }
    }
}
