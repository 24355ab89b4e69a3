//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Storefront page (catalog grid + cart panel)
//! GET  /health           - Liveness check
//!
//! # Cart (HTMX fragments, or redirect to / for plain form posts)
//! GET  /cart             - Cart panel fragment
//! GET  /cart/count       - Cart count badge fragment
//! POST /cart/add         - Add one unit of `item_id`
//! POST /cart/remove      - Remove the line for `item_id`
//! POST /cart/toggle      - Show/hide the cart panel
//!
//! # Checkout
//! POST /checkout         - Checkout stub (notification only)
//! ```

pub mod cart;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/toggle", post(cart::toggle))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/cart", cart_routes())
        .route("/checkout", post(cart::checkout))
}
