//! Cache keys for backend product responses.

/// Cache key for product payloads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products { page: u32 },
    Product(String),
    Catalog,
    Shops,
}
