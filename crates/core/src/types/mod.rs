//! Core types for Pasar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;

pub use credential::BearerToken;
pub use email::{Email, EmailError};
pub use id::{ItemId, ProductId, UserId};
pub use price::{Money, MoneyError};
