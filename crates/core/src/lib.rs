//! Blockshop Core - catalog, cart and notification types.
//!
//! This crate holds the storefront's domain model:
//! - [`catalog`] - the immutable item catalog loaded at startup
//! - [`cart`] - cart snapshots and the store operations that derive them
//! - [`notification`] - events emitted by cart operations and the toasts
//!   they become
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! sessions, no HTTP. Every cart operation takes a snapshot and returns a new
//! one together with an event, so the whole state machine can be tested
//! without a display layer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod notification;
pub mod types;

pub use cart::{Cart, CartError, CartLine, CartStore, Transition};
pub use catalog::{Catalog, CatalogError, Item, ItemIcon};
pub use notification::{CartEvent, CheckoutRejection, Notification, NotificationLevel};
pub use types::*;
