//! Cart operation errors.

use thiserror::Error;

use crate::backend::BackendError;
use crate::storage::StorageError;

/// A precondition failed before any I/O was attempted.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("item id is required")]
    MissingItemId,

    #[error("auth token is required")]
    MissingToken,

    #[error("product id is required")]
    MissingProductId,
}

/// Errors from cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Rejected locally; nothing was sent.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The backend call failed (network, timeout or non-2xx).
    #[error("Backend error: {0}")]
    Transport(#[from] BackendError),

    /// Reading or writing the local store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CartError {
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
