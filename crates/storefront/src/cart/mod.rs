//! Client-side cart state and its synchronization with the backend.
//!
//! - [`CartStore`] owns the persisted cart (key `"cart"`) and token
//!   (key `"token"`) on top of any [`KeyValueStore`](crate::storage::KeyValueStore).
//! - [`CartSyncClient`] validates and performs remote cart mutations.
//! - [`CartService`] ties the two together: a line is only removed locally
//!   after the backend has accepted the delete.

mod error;
mod service;
mod store;
mod sync;

pub use error::{CartError, ValidationError};
pub use service::{Addition, CartService, Removal};
pub use store::CartStore;
pub use sync::CartSyncClient;
