//! Horizontal product card for an order line.
//!
//! Shows the variant with its quantity stepper and, nested under it, the
//! connected (upsell) products attached to the line. Stepper and remove
//! buttons post to the cart routes and swap the order panel.

use askama::Template;
use bolt_core::Price;

use crate::commerce::{ConnectedProduct, CurrencyCode, OrderLine};

/// A connected product nested under a line. Informational only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedProductCard {
    pub id: String,
    pub title: String,
    pub quantity: u32,
    pub price: String,
    pub image_src: Option<String>,
}

impl ConnectedProductCard {
    fn new(product: &ConnectedProduct, currency: CurrencyCode) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.name.clone(),
            quantity: product.quantity,
            price: Price::from_minor(product.price_with_tax, currency).display(),
            image_src: product.preview.clone(),
        }
    }
}

/// Line item card component.
#[derive(Debug, Clone, Template)]
#[template(path = "components/line_item_card.html")]
pub struct LineItemCard {
    pub line_id: String,
    pub variant_id: String,
    pub title: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image_src: Option<String>,
    pub connected: Vec<ConnectedProductCard>,
}

impl LineItemCard {
    #[must_use]
    pub fn new(line: &OrderLine, currency: CurrencyCode) -> Self {
        Self {
            line_id: line.id.to_string(),
            variant_id: line.product_variant.id.to_string(),
            title: line.product_variant.name.clone(),
            quantity: line.quantity,
            unit_price: Price::from_minor(line.unit_price_with_tax, currency).display(),
            line_price: Price::from_minor(line.line_price_with_tax, currency).display(),
            image_src: line.featured_asset.as_ref().map(|asset| asset.preview.clone()),
            connected: line
                .connected_products
                .iter()
                .map(|product| ConnectedProductCard::new(product, currency))
                .collect(),
        }
    }

    /// Quantity after one step down. Zero removes the line.
    #[must_use]
    pub const fn decrement(&self) -> u32 {
        self.quantity.saturating_sub(1)
    }

    /// Quantity after one step up.
    #[must_use]
    pub const fn increment(&self) -> u32 {
        self.quantity.saturating_add(1)
    }
}
