//! Commerce backend access.
//!
//! # Architecture
//!
//! - [`CommerceProvider`] is the seam route handlers depend on: one read per
//!   reference-data kind plus the order mutations used by checkout and cart.
//! - [`CommerceClient`] implements it against the backend's GraphQL shop API
//!   using `reqwest`, with `graphql_client` operations generated from the
//!   schema and documents under `graphql/shop/` (see [`queries`]).
//! - The backend is the source of truth; nothing is written locally.
//!
//! No retries are performed here. A failing call surfaces as
//! [`CommerceErrorKind::BackendUnavailable`] (network, timeout) or
//! [`CommerceErrorKind::BackendError`] (anything the backend answered with).
//!
//! # Example
//!
//! ```rust,ignore
//! use bolt_storefront::commerce::{CommerceClient, CommerceProvider, ShopContext};
//!
//! let client = CommerceClient::new(&config.commerce)?;
//! let ctx = ShopContext::new(Some(token), None);
//! let countries = client.available_countries(&ctx).await?;
//! ```

mod client;
mod context;
mod conversions;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod queries;
pub mod types;

pub use client::CommerceClient;
pub use context::ShopContext;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the commerce backend.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// The backend could not be reached or did not answer in time.
    #[error("Commerce backend unavailable: {0}")]
    Unavailable(String),

    /// The backend answered with a non-success HTTP status.
    #[error("Commerce backend returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// The GraphQL response carried errors.
    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQL(Vec<String>),

    /// The response payload could not be decoded.
    #[error("Malformed backend response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Coarse classification of [`CommerceError`] used by the route layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommerceErrorKind {
    /// Network error or timeout.
    BackendUnavailable,
    /// Non-success response from the backend.
    BackendError,
}

impl CommerceError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> CommerceErrorKind {
        match self {
            Self::Unavailable(_) => CommerceErrorKind::BackendUnavailable,
            Self::Status { .. } | Self::GraphQL(_) | Self::Parse(_) => {
                CommerceErrorKind::BackendError
            }
        }
    }
}

impl From<reqwest::Error> for CommerceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            };
        }
        // Connect failures, timeouts and dropped connections.
        Self::Unavailable(err.to_string())
    }
}

/// Result type alias for backend calls.
pub type Result<T> = std::result::Result<T, CommerceError>;

/// Access to the commerce backend.
///
/// Every call takes the shopper's [`ShopContext`] so the backend can resolve
/// the active session (and its active order).
#[async_trait]
pub trait CommerceProvider: Send + Sync {
    /// Countries the shop delivers to.
    async fn available_countries(&self, ctx: &ShopContext) -> Result<Vec<Country>>;

    /// Shipping methods eligible for the active order.
    async fn eligible_shipping_methods(&self, ctx: &ShopContext)
    -> Result<Vec<ShippingMethodQuote>>;

    /// Payment methods for the active order, including ineligible ones.
    async fn eligible_payment_methods(&self, ctx: &ShopContext) -> Result<Vec<PaymentMethodQuote>>;

    /// The logged-in customer with their saved addresses, if any.
    async fn active_customer(&self, ctx: &ShopContext) -> Result<Option<ActiveCustomer>>;

    /// The shopper's active (not yet placed) order, if any.
    async fn active_order(&self, ctx: &ShopContext) -> Result<Option<Order>>;

    /// Change the quantity of an order line.
    async fn adjust_order_line(
        &self,
        ctx: &ShopContext,
        line_id: &OrderLineId,
        quantity: u32,
    ) -> Result<OrderUpdate>;

    /// Remove an order line.
    async fn remove_order_line(&self, ctx: &ShopContext, line_id: &OrderLineId)
    -> Result<OrderUpdate>;

    /// Set the shipping address of the active order.
    async fn set_order_shipping_address(
        &self,
        ctx: &ShopContext,
        address: &AddressInput,
    ) -> Result<OrderUpdate>;

    /// Select the shipping method of the active order.
    async fn set_order_shipping_method(
        &self,
        ctx: &ShopContext,
        method_id: &ShippingMethodId,
    ) -> Result<OrderUpdate>;
}
