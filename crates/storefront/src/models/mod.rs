//! Domain models for storefront.
//!
//! Order, customer and reference data come from the commerce backend (see
//! [`crate::commerce::types`]); this module only holds what the storefront
//! keeps itself, in the visitor session.

pub mod session;

pub use session::keys as session_keys;
