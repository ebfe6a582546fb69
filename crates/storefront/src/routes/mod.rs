//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! # Checkout
//! GET  /checkout                   - Checkout page
//! POST /checkout/shipping-address  - Set shipping address (redirects back)
//! POST /checkout/shipping-method   - Select shipping method (redirects back)
//!
//! # Cart (HTMX fragments)
//! POST /cart/adjust                - Change line quantity (returns order panel)
//! POST /cart/remove                - Remove line (returns order panel)
//!
//! # API
//! GET  /api/active-order           - Active order snapshot (JSON)
//! POST /api/scroll                 - Save breadcrumb scroll offset
//! ```

pub mod api;
pub mod cart;
pub mod checkout;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the page, fragment and API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/checkout", get(checkout::show))
        .route(
            "/checkout/shipping-address",
            post(checkout::set_shipping_address),
        )
        .route(
            "/checkout/shipping-method",
            post(checkout::set_shipping_method),
        )
        .route("/cart/adjust", post(cart::adjust))
        .route("/cart/remove", post(cart::remove))
        .nest("/api", api::routes())
}
