//! Home page route handler.
//!
//! The whole shop is one page: a hero, the catalog grid and the cart panel.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use blockshop_core::Item;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::models::session;
use crate::routes::cart::{CartView, ToastView};
use crate::state::AppState;

/// Catalog item display data for templates.
#[derive(Clone)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image: String,
    /// SVG symbol name for the item icon.
    pub icon: &'static str,
    pub price: String,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            category: item.category.clone(),
            image: item.image.clone(),
            icon: item.icon.name(),
            price: item.unit_price.display(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub items: Vec<ItemView>,
    pub cart: CartView,
    pub count: u64,
    pub panel_open: bool,
    pub toasts: Vec<ToastView>,
}

/// Display the storefront.
///
/// Drains any flash notifications left by a plain form post.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let cart = session::load_cart(&session, state.cart_store()).await?;
    let toasts = session::take_flash(&session)
        .await?
        .iter()
        .map(ToastView::from)
        .collect();

    Ok(HomeTemplate {
        items: state.catalog().items().iter().map(ItemView::from).collect(),
        count: cart.total_items(),
        cart: CartView::from(&cart),
        panel_open: session::cart_panel_open(&session).await?,
        toasts,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use blockshop_core::{Cart, Catalog, Notification};

    use super::*;

    fn render(cart: &Cart, toasts: Vec<ToastView>) -> String {
        HomeTemplate {
            items: Catalog::builtin().items().iter().map(ItemView::from).collect(),
            cart: CartView::from(cart),
            count: cart.total_items(),
            panel_open: true,
            toasts,
        }
        .render()
        .unwrap()
    }

    #[test]
    fn test_item_view() {
        let catalog = Catalog::builtin();
        let view = ItemView::from(&catalog.items()[2]);
        assert_eq!(view.id, "sea-pickle-farm");
        assert_eq!(view.category, "Farms");
        assert_eq!(view.icon, "pickaxe");
        assert_eq!(view.price, "€3.50");
    }

    #[test]
    fn test_home_renders_every_item_card() {
        let html = render(&Cart::default(), Vec::new());
        for item in Catalog::builtin().items() {
            assert!(html.contains(&item.name), "missing {}", item.name);
            assert!(html.contains(&item.image));
            assert!(html.contains(&format!(r#"value="{}""#, item.id)));
        }
        assert!(html.contains("€0.25"));
        assert!(html.contains("Your cart is empty"));
    }

    #[test]
    fn test_home_renders_flash_toasts() {
        let toasts = vec![ToastView::from(&Notification::error("Your cart is empty!"))];
        let html = render(&Cart::default(), toasts);
        assert!(html.contains("toast-error"));
        assert!(html.contains("Your cart is empty!"));
    }

    #[test]
    fn test_count_badge_swaps_only_itself() {
        let html = render(&Cart::default(), Vec::new());

        let slot = html.find(r#"class="cart-count-slot""#).unwrap();
        let slot_tag = &html[slot..slot + html[slot..].find('>').unwrap()];
        assert!(slot_tag.contains(r#"hx-get="/cart/count""#));
        assert!(slot_tag.contains(r#"hx-target="this""#));
        assert!(slot_tag.contains(r#"hx-swap="innerHTML""#));

        // The toggle form targets the cart panel; the badge must not sit
        // inside it and inherit that target.
        let toggle = html.find(r#"action="/cart/toggle""#).unwrap();
        let toggle_end = toggle + html[toggle..].find("</form>").unwrap();
        assert!(toggle_end < slot);
    }

    #[test]
    fn test_htmx_script_is_pinned_without_inline_styles() {
        let html = render(&Cart::default(), Vec::new());
        assert!(html.contains(r#"integrity="sha384-"#));
        assert!(html.contains(r#"name="htmx-config""#));
        assert!(html.contains("includeIndicatorStyles"));
    }
}
