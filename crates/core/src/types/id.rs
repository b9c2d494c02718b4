//! Newtype IDs for type-safe entity references.
//!
//! Rows in the hosted store and entries in the storefront data files are
//! keyed by opaque strings (UUIDs for new records, short numeric strings for
//! hand-written seed data). Use the `define_id!` macro to create wrappers that
//! prevent accidentally mixing IDs from different entity types.

use uuid::Uuid;

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `generate()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use marom_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("1");
/// let gadget = GadgetId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// assert_eq!(widget.as_str(), gadget.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generate a fresh random (UUID v4) ID.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::new_uuid())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Returns `true` if the ID is empty (never assigned).
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Generate a random UUID v4 string (used by `define_id!`).
#[doc(hidden)]
#[must_use]
pub fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

// Hosted-store rows
define_id!(ProductId);
define_id!(IngredientId);
define_id!(OrderId);
define_id!(CustomerId);
define_id!(LeadId);
define_id!(ContactMessageId);

// File-backed entries
define_id!(BlogPostId);
define_id!(LegalDocumentId);
define_id!(IngredientEntryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = OrderId::new("ord_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ord_42\"");

        let parsed: OrderId = serde_json::from_str("\"ord_42\"").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_generated_ids_are_uuids() {
        let a = BlogPostId::generate();
        let b = BlogPostId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn test_empty_id() {
        assert!(ProductId::default().is_empty());
        assert!(ProductId::new("  ").is_empty());
        assert!(!ProductId::new("p1").is_empty());
    }

    #[test]
    fn test_display_and_conversions() {
        let id = LegalDocumentId::from("terms");
        assert_eq!(id.to_string(), "terms");
        let inner: String = id.into();
        assert_eq!(inner, "terms");
    }
}
