//! Integration tests for the Blockshop storefront.
//!
//! The tests drive the full router in process, with the same middleware
//! stack the binary serves, so no server or network is needed:
//!
//! ```bash
//! cargo test -p blockshop-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart flows over HTMX and plain form posts
//! - `storefront_pages` - Home page, health check, headers
//!
//! Shared request helpers live in [`TestClient`].

#![cfg_attr(not(test), forbid(unsafe_code))]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Request, StatusCode, header};
use blockshop_core::Catalog;
use blockshop_storefront::{app, config::StorefrontConfig, state::AppState};
use tower::ServiceExt;

/// Fully rendered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Header value as a string, if present and valid.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// In-process client for one visitor.
///
/// Remembers the session cookie between requests, the way a browser would.
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// Client for a storefront serving the built-in catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(Catalog::builtin())
    }

    /// Client for a storefront serving `catalog`.
    #[must_use]
    pub fn with_catalog(catalog: Catalog) -> Self {
        Self::with_state(AppState::new(StorefrontConfig::default(), catalog))
    }

    /// Client for a storefront serving `state`. Keep a clone of the state to
    /// inspect the session store from the test.
    #[must_use]
    pub fn with_state(state: AppState) -> Self {
        Self {
            router: app(state),
            cookie: None,
        }
    }

    /// Second visitor sharing the same server and session store.
    #[must_use]
    pub fn fresh_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    /// GET a path.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or served.
    pub async fn get(&mut self, path: &str, htmx: bool) -> TestResponse {
        let request = self.request("GET", path, htmx).body(Body::empty());
        self.send_raw(request.unwrap_or_else(|e| panic!("bad request: {e}"))).await
    }

    /// POST an urlencoded form.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or served.
    pub async fn post(&mut self, path: &str, form: &str, htmx: bool) -> TestResponse {
        let request = self
            .request("POST", path, htmx)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()));
        self.send_raw(request.unwrap_or_else(|e| panic!("bad request: {e}"))).await
    }

    /// Add one unit of `item_id` over HTMX.
    pub async fn add(&mut self, item_id: &str) -> TestResponse {
        self.post("/cart/add", &format!("item_id={item_id}"), true).await
    }

    /// Remove the line for `item_id` over HTMX.
    pub async fn remove(&mut self, item_id: &str) -> TestResponse {
        self.post("/cart/remove", &format!("item_id={item_id}"), true).await
    }

    fn request(&self, method: &str, path: &str, htmx: bool) -> axum::http::request::Builder {
        let mut builder = Request::builder().method(method).uri(path);
        if htmx {
            builder = builder.header("hx-request", "true");
        }
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        builder
    }

    /// Send a prebuilt request, carrying the session cookie forward.
    ///
    /// # Panics
    ///
    /// Panics if the response body cannot be read.
    pub async fn send_raw(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .unwrap_or_else(|e| match e {});

        if let Some(set_cookie) = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            && let Some(pair) = set_cookie.split(';').next()
        {
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"));

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
