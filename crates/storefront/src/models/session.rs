//! Per-visitor state kept in the session.
//!
//! The session holds three things: the cart snapshot, whether the cart panel
//! is hidden, and flash notifications waiting for the next page render.

use blockshop_core::{Cart, CartStore, Notification};
use tower_sessions::Session;
use tower_sessions::session::Error;

/// Session keys.
pub mod keys {
    /// Key for the visitor's cart snapshot.
    pub const CART: &str = "cart";

    /// Key for the cart panel visibility flag (absent means visible).
    pub const CART_PANEL_HIDDEN: &str = "cart_panel_hidden";

    /// Key for notifications queued for the next full page render.
    pub const FLASH: &str = "flash";
}

/// Most flash notifications kept between renders.
const MAX_FLASH: usize = 5;

/// Load the visitor's cart, or an empty cart if they have none yet.
///
/// # Errors
///
/// Returns an error if the session store fails or holds an unreadable value.
pub async fn load_cart(session: &Session, store: &CartStore) -> Result<Cart, Error> {
    Ok(session
        .get::<Cart>(keys::CART)
        .await?
        .unwrap_or_else(|| store.empty_cart()))
}

/// Replace the visitor's cart snapshot.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), Error> {
    session.insert(keys::CART, cart).await
}

/// Whether the cart panel is currently shown.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn cart_panel_open(session: &Session) -> Result<bool, Error> {
    let hidden = session
        .get::<bool>(keys::CART_PANEL_HIDDEN)
        .await?
        .unwrap_or(false);
    Ok(!hidden)
}

/// Flip cart panel visibility and return the new state (true = shown).
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn toggle_cart_panel(session: &Session) -> Result<bool, Error> {
    let open = !cart_panel_open(session).await?;
    session.insert(keys::CART_PANEL_HIDDEN, !open).await?;
    Ok(open)
}

/// Queue a notification for the next full page render.
///
/// Only the newest few are kept so a visitor who never reloads the page does
/// not grow their session without bound.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn push_flash(session: &Session, notification: Notification) -> Result<(), Error> {
    let mut pending = session
        .get::<Vec<Notification>>(keys::FLASH)
        .await?
        .unwrap_or_default();
    pending.push(notification);
    if pending.len() > MAX_FLASH {
        pending.drain(..pending.len() - MAX_FLASH);
    }
    session.insert(keys::FLASH, pending).await
}

/// Remove and return all queued notifications, oldest first.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn take_flash(session: &Session) -> Result<Vec<Notification>, Error> {
    Ok(session
        .remove::<Vec<Notification>>(keys::FLASH)
        .await?
        .unwrap_or_default())
}
