//! Core value types for Blockshop.
//!
//! This module provides type-safe wrappers for item ids and prices.

pub mod id;
pub mod price;

pub use id::{ItemId, ItemIdError};
pub use price::{CurrencyCode, Price, PriceError};
