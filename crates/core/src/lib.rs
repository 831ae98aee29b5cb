//! Pasar Core - Shared types and the cart model.
//!
//! This crate provides the types used across all Pasar components:
//! - `storefront` - Backend proxy server and cart client library
//! - `cli` - Shopper command-line client
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no storage,
//! no HTTP clients. The cart invariants (grand total, empty-group removal)
//! are enforced here so every caller gets them for free.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, money, emails and bearer tokens
//! - [`cart`] - Shop-grouped cart with derived grand total

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::{Cart, CartGroup, CartItem, ProductSnapshot, Quantity, QuantityError, Shop};
pub use types::*;
