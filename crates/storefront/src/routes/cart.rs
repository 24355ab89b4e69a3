//! Cart route handlers.
//!
//! Every cart intent is a form post. HTMX requests get back the re-rendered
//! cart panel with a toast swapped in out of band, and an `HX-Trigger` that
//! makes the count badge refresh. Plain form posts get a flash notification
//! and a redirect to the home page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use blockshop_core::{Cart, CartLine, ItemId, Notification, Transition};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::models::session;
use crate::state::AppState;

/// Event fired on the client after any cart change.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub item_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub subtotal: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub total: String,
    pub item_count: u64,
    pub is_empty: bool,
}

/// Toast display data for templates.
#[derive(Clone)]
pub struct ToastView {
    pub level: &'static str,
    pub message: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item().id.to_string(),
            name: line.item().name.clone(),
            quantity: line.quantity(),
            unit_price: line.item().unit_price.display(),
            subtotal: line.subtotal().display(),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().iter().map(CartLineView::from).collect(),
            total: cart.total_price().display(),
            item_count: cart.total_items(),
            is_empty: cart.is_empty(),
        }
    }
}

impl From<&Notification> for ToastView {
    fn from(notification: &Notification) -> Self {
        Self {
            level: notification.level.as_str(),
            message: notification.message.clone(),
        }
    }
}

// =============================================================================
// Forms & Templates
// =============================================================================

/// Add/remove form data.
#[derive(Debug, Deserialize)]
pub struct CartItemForm {
    pub item_id: String,
}

impl CartItemForm {
    fn item_id(&self) -> Result<ItemId> {
        ItemId::parse(&self.item_id).map_err(|e| AppError::BadRequest(e.to_string()))
    }
}

/// Cart panel fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_panel.html")]
pub struct CartPanelTemplate {
    pub cart: CartView,
    pub panel_open: bool,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u64,
}

/// Response to an HTMX cart action: the panel, plus a toast swapped out of
/// band. The count badge refreshes itself on the `cart-updated` event.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartUpdateTemplate {
    pub cart: CartView,
    pub panel_open: bool,
    pub toast: ToastView,
}

// =============================================================================
// Helpers
// =============================================================================

/// Whether the request was issued by HTMX.
fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Persist the new snapshot and render the outcome of a cart action.
async fn respond(
    session: &Session,
    headers: &HeaderMap,
    transition: Transition,
) -> Result<Response> {
    session::save_cart(session, &transition.cart).await?;
    let notification = transition.notification();

    if !is_htmx(headers) {
        session::push_flash(session, notification).await?;
        return Ok(Redirect::to("/").into_response());
    }

    let template = CartUpdateTemplate {
        cart: CartView::from(&transition.cart),
        panel_open: session::cart_panel_open(session).await?,
        toast: ToastView::from(&notification),
    };

    Ok((AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), template).into_response())
}

// =============================================================================
// Handlers
// =============================================================================

/// Cart panel fragment.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CartPanelTemplate> {
    let cart = session::load_cart(&session, state.cart_store()).await?;
    Ok(CartPanelTemplate {
        cart: CartView::from(&cart),
        panel_open: session::cart_panel_open(&session).await?,
    })
}

/// Cart count badge fragment.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Result<CartCountTemplate> {
    let cart = session::load_cart(&session, state.cart_store()).await?;
    Ok(CartCountTemplate {
        count: cart.total_items(),
    })
}

/// Add one unit of an item to the cart.
#[instrument(skip(state, session, headers))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let item_id = form.item_id()?;
    let cart = session::load_cart(&session, state.cart_store()).await?;
    let transition = state.cart_store().add(&cart, &item_id)?;

    tracing::info!(
        item_id = %item_id,
        total_items = transition.cart.total_items(),
        "Item added to cart"
    );
    add_breadcrumb("cart", "Added item", Some(&[("item_id", item_id.as_str())]));

    respond(&session, &headers, transition).await
}

/// Remove an item's whole line from the cart.
#[instrument(skip(state, session, headers))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartItemForm>,
) -> Result<Response> {
    let item_id = form.item_id()?;
    let cart = session::load_cart(&session, state.cart_store()).await?;
    let transition = state.cart_store().remove(&cart, &item_id);

    tracing::info!(item_id = %item_id, "Item removed from cart");
    add_breadcrumb("cart", "Removed item", Some(&[("item_id", item_id.as_str())]));

    respond(&session, &headers, transition).await
}

/// Checkout stub: acknowledges a non-empty cart, refuses an empty one.
///
/// Nothing is submitted anywhere and the cart is left as it was.
#[instrument(skip(state, session, headers))]
pub async fn checkout(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let cart = session::load_cart(&session, state.cart_store()).await?;
    let transition = state.cart_store().checkout(&cart);

    tracing::info!(
        total_items = cart.total_items(),
        total_price = %cart.total_price(),
        event = ?transition.event,
        "Checkout requested"
    );
    add_breadcrumb("cart", "Checkout requested", None);

    respond(&session, &headers, transition).await
}

/// Show or hide the cart panel.
#[instrument(skip(state, session, headers))]
pub async fn toggle(
    State(state): State<AppState>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    let panel_open = session::toggle_cart_panel(&session).await?;

    if !is_htmx(&headers) {
        return Ok(Redirect::to("/").into_response());
    }

    let cart = session::load_cart(&session, state.cart_store()).await?;
    Ok(CartPanelTemplate {
        cart: CartView::from(&cart),
        panel_open,
    }
    .into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::http::HeaderValue;
    use blockshop_core::{CartStore, Catalog};

    use super::*;

    fn cart_with(ids: &[&str]) -> Cart {
        let store = CartStore::new(Arc::new(Catalog::builtin()));
        ids.iter().fold(store.empty_cart(), |cart, id| {
            store.add(&cart, &ItemId::parse(id).unwrap()).unwrap().cart
        })
    }

    #[test]
    fn test_cart_view_formats_prices() {
        let view = CartView::from(&cart_with(&["sea-pickle-farm", "sea-pickle-farm", "elytra"]));
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "€8.00");
        assert!(!view.is_empty);

        let farm = &view.lines[0];
        assert_eq!(farm.item_id, "sea-pickle-farm");
        assert_eq!(farm.quantity, 2);
        assert_eq!(farm.unit_price, "€3.50");
        assert_eq!(farm.subtotal, "€7.00");
    }

    #[test]
    fn test_empty_cart_view() {
        let view = CartView::from(&cart_with(&[]));
        assert!(view.is_empty);
        assert_eq!(view.total, "€0.00");
        assert_eq!(view.item_count, 0);
    }

    #[test]
    fn test_toast_view() {
        let toast = ToastView::from(&Notification::error("Your cart is empty!"));
        assert_eq!(toast.level, "error");
        assert_eq!(toast.message, "Your cart is empty!");
    }

    #[test]
    fn test_is_htmx() {
        let mut headers = HeaderMap::new();
        assert!(!is_htmx(&headers));
        headers.insert("hx-request", HeaderValue::from_static("true"));
        assert!(is_htmx(&headers));
    }

    #[test]
    fn test_cart_panel_renders_lines_and_total() {
        let html = CartPanelTemplate {
            cart: CartView::from(&cart_with(&["krypton-client"])),
            panel_open: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("Krypton Client"));
        assert!(html.contains("Qty: 1"));
        assert!(html.contains("€2.00"));
        assert!(html.contains("Checkout"));
    }

    #[test]
    fn test_empty_cart_panel_hides_checkout() {
        let html = CartPanelTemplate {
            cart: CartView::from(&cart_with(&[])),
            panel_open: true,
        }
        .render()
        .unwrap();
        assert!(html.contains("Your cart is empty"));
        assert!(!html.contains("/checkout"));
    }

    #[test]
    fn test_cart_update_includes_oob_toast() {
        let html = CartUpdateTemplate {
            cart: CartView::from(&cart_with(&["elytra", "elytra"])),
            panel_open: true,
            toast: ToastView::from(&Notification::success("Elytra added to cart!")),
        }
        .render()
        .unwrap();
        assert!(html.contains(r#"id="cart-panel""#));
        assert!(html.contains("Qty: 2"));
        assert!(html.contains(r#"hx-swap-oob="beforeend:#toasts""#));
        assert!(html.contains("Elytra added to cart!"));
    }
}
