//! Identifier types for backend entities.
//!
//! The backend is inconsistent about identifier encoding: the same kind of id
//! arrives as a JSON integer from one endpoint and as a string from another.
//! Use the `define_remote_id!` macro to create type-safe wrappers that accept
//! both forms and write back whichever form they were given.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe backend identifier.
///
/// Creates an untagged enum with `Number(i64)` and `Text(String)` variants:
/// - `Serialize`/`Deserialize` with `#[serde(untagged)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - `is_blank()` treating `0` and blank strings as absent
/// - `FromStr` that yields `Number` for integer text (used for URL path segments)
/// - `From<i64>`, `From<&str>` and `From<String>`
///
/// # Example
///
/// ```rust
/// # use pasar_core::define_remote_id;
/// define_remote_id!(OrderId);
///
/// let from_path: OrderId = "42".parse().unwrap();
/// assert_eq!(from_path, OrderId::Number(42));
/// ```
#[macro_export]
macro_rules! define_remote_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(untagged)]
        pub enum $name {
            /// Integer identifier.
            Number(i64),
            /// String identifier.
            Text(String),
        }

        impl $name {
            /// Whether this identifier counts as missing.
            ///
            /// Blank strings and the integer `0` are treated as absent.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                match self {
                    Self::Number(n) => *n == 0,
                    Self::Text(s) => s.trim().is_empty(),
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    Self::Number(n) => write!(f, "{n}"),
                    Self::Text(s) => f.write_str(s),
                }
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Ok(s.parse::<i64>()
                    .map_or_else(|_| Self::Text(s.to_owned()), Self::Number))
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self::Number(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::Text(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self::Text(id)
            }
        }
    };
}

define_remote_id!(ItemId);
define_remote_id!(UserId);

/// Identifier of a catalog product.
///
/// Product ids are path segments on the backend, so they are kept as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the id is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_keeps_wire_form() {
        let numeric: ItemId = serde_json::from_str("7").unwrap();
        assert_eq!(numeric, ItemId::Number(7));
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "7");

        let text: ItemId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(text, ItemId::Text("7".to_owned()));
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"7\"");
    }

    #[test]
    fn test_item_id_blank() {
        assert!(ItemId::from("").is_blank());
        assert!(ItemId::from("   ").is_blank());
        assert!(ItemId::from(0).is_blank());
        assert!(!ItemId::from(12).is_blank());
        assert!(!ItemId::from("abc").is_blank());
    }

    #[test]
    fn test_item_id_from_path_segment() {
        assert_eq!("15".parse::<ItemId>().unwrap(), ItemId::Number(15));
        assert_eq!(
            "line-15".parse::<ItemId>().unwrap(),
            ItemId::Text("line-15".to_owned())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ItemId::from(3).to_string(), "3");
        assert_eq!(UserId::from("u-9").to_string(), "u-9");
    }

    #[test]
    fn test_product_id_blank() {
        assert!(ProductId::new(" ").is_blank());
        assert!(!ProductId::new("p-1").is_blank());
    }
}
