//! HTTP middleware stack for the storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added in `main`)
//! 2. `TraceLayer` (request span with a `request_id` field)
//! 3. Request ID (record/propagate `x-request-id`)
//! 4. Security headers (CSP, framing, sniffing)
//! 5. Session layer (tower-sessions over [`SessionMemoryStore`], swept for
//!    expired records by [`spawn_expired_session_deletion`])

pub mod request_id;
pub mod security_headers;
pub mod session;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::{
    EXPIRED_SESSION_SWEEP_INTERVAL, SESSION_COOKIE_NAME, SessionMemoryStore,
    create_session_layer, spawn_expired_session_deletion,
};
