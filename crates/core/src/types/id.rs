//! Newtype IDs for type-safe entity references.
//!
//! The commerce backend hands out opaque string identifiers (numeric strings
//! or UUIDs depending on its ID strategy). Use the `define_id!` macro to wrap
//! them so IDs from different entity types cannot be mixed up.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use bolt_core::define_id;
/// define_id!(OrderId);
/// define_id!(CountryId);
///
/// let order_id = OrderId::new("1");
/// let country_id = CountryId::new("1");
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = country_id;
/// assert_eq!(order_id.as_str(), country_id.as_str());
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
            PartialOrd,
            Ord,
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

            /// Borrow the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
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
    };
}

define_id!(OrderId);
define_id!(OrderLineId);
define_id!(ProductVariantId);
define_id!(CountryId);
define_id!(ShippingMethodId);
define_id!(PaymentMethodId);
define_id!(AddressId);
define_id!(CustomerId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = OrderLineId::new("42");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn test_id_display_matches_backend_value() {
        let id = CountryId::from("7");
        assert_eq!(id.to_string(), "7");
        assert_eq!(String::from(id), "7");
    }

    #[test]
    fn test_default_id_is_empty() {
        // Lets records holding ids be built with `..Default::default()`.
        assert_eq!(AddressId::default().as_str(), "");
        assert_eq!(AddressId::default(), AddressId::new(""));
    }
}
