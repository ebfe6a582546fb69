//! Domain types for the commerce backend's shop API.
//!
//! Field names follow the backend's camelCase JSON; monetary values are raw
//! minor units and are only turned into display prices by the components.

use serde::{Deserialize, Serialize};

pub use bolt_core::{
    AddressId, CountryId, CurrencyCode, CustomerId, MinorUnits, OrderId, OrderLineId, OrderState,
    PaymentMethodId, ProductVariantId, ShippingMethodId,
};

// =============================================================================
// Reference Data
// =============================================================================

/// A country the shop delivers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: CountryId,
    /// ISO 3166-1 alpha-2 code.
    pub code: String,
    pub name: String,
}

/// A shipping method quote for the active order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingMethodQuote {
    pub id: ShippingMethodId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_with_tax: MinorUnits,
}

/// A payment method quote for the active order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodQuote {
    pub id: PaymentMethodId,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub is_eligible: bool,
    pub eligibility_message: Option<String>,
}

// =============================================================================
// Customer
// =============================================================================

/// The logged-in customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCustomer {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub addresses: Vec<CustomerAddress>,
}

impl ActiveCustomer {
    /// "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// The address to prefill checkout with.
    ///
    /// The default shipping address, or the first saved address.
    #[must_use]
    pub fn preferred_shipping_address(&self) -> Option<&CustomerAddress> {
        self.addresses
            .iter()
            .find(|address| address.default_shipping_address)
            .or_else(|| self.addresses.first())
    }
}

/// A saved customer address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddress {
    pub id: AddressId,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub street_line1: String,
    pub street_line2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country: AddressCountry,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub default_shipping_address: bool,
    #[serde(default)]
    pub default_billing_address: bool,
}

/// Country reference embedded in an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressCountry {
    pub code: String,
    pub name: String,
}

/// Shipping address submitted from the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub street_line1: String,
    pub street_line2: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: String,
    pub phone_number: Option<String>,
}

// =============================================================================
// Order
// =============================================================================

/// The shopper's active order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub code: String,
    pub active: bool,
    pub state: OrderState,
    pub currency_code: CurrencyCode,
    #[serde(default)]
    pub total_quantity: u32,
    pub sub_total_with_tax: MinorUnits,
    pub shipping_with_tax: MinorUnits,
    pub total_with_tax: MinorUnits,
    #[serde(default)]
    pub tax_summary: Vec<TaxLine>,
    #[serde(default)]
    pub discounts: Vec<Discount>,
    #[serde(default)]
    pub shipping_lines: Vec<ShippingLine>,
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    /// Whether the order has nothing to check out.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Id of the shipping method currently selected on the order.
    #[must_use]
    pub fn selected_shipping_method(&self) -> Option<&ShippingMethodId> {
        self.shipping_lines
            .first()
            .map(|line| &line.shipping_method.id)
    }
}

/// One product-variant/quantity pairing within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderLineId,
    pub quantity: u32,
    pub unit_price_with_tax: MinorUnits,
    pub line_price_with_tax: MinorUnits,
    pub featured_asset: Option<Asset>,
    pub product_variant: ProductVariant,
    /// Upsell entries shown under the line. Informational only.
    #[serde(default)]
    pub connected_products: Vec<ConnectedProduct>,
}

/// The variant an order line refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: ProductVariantId,
    pub name: String,
    #[serde(default)]
    pub sku: String,
}

/// A product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub preview: String,
}

/// An upsell/connected product entry attached to an order line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedProduct {
    pub id: ProductVariantId,
    pub name: String,
    pub quantity: u32,
    pub price_with_tax: MinorUnits,
    pub preview: Option<String>,
}

/// One tax rate's share of the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxLine {
    pub description: String,
    pub tax_rate: f64,
    pub tax_base: MinorUnits,
    pub tax_total: MinorUnits,
}

/// A discount applied to the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discount {
    pub description: String,
    pub amount_with_tax: MinorUnits,
}

/// The shipping method selected on the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLine {
    pub shipping_method: ShippingLineMethod,
    pub price_with_tax: MinorUnits,
}

/// Method reference embedded in a shipping line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingLineMethod {
    pub id: ShippingMethodId,
    pub name: String,
}

// =============================================================================
// Mutation Results
// =============================================================================

/// A rejection the backend reports as data rather than as a failure
/// (e.g., insufficient stock, no active order).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderError {
    pub error_code: String,
    pub message: String,
}

/// Outcome of an order mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderUpdate {
    /// The mutation succeeded; the backend returned the updated order.
    Updated(Box<Order>),
    /// The backend rejected the mutation with a displayable message.
    Rejected(OrderError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn address(id: &str, default_shipping: bool) -> CustomerAddress {
        CustomerAddress {
            id: AddressId::new(id),
            street_line1: format!("Street {id}"),
            default_shipping_address: default_shipping,
            ..CustomerAddress::default()
        }
    }

    fn customer(addresses: Vec<CustomerAddress>) -> ActiveCustomer {
        ActiveCustomer {
            id: CustomerId::new("1"),
            first_name: "Anna".to_string(),
            last_name: "Kovács".to_string(),
            email_address: "anna@example.com".to_string(),
            phone_number: None,
            addresses,
        }
    }

    #[test]
    fn test_preferred_address_is_default_shipping() {
        let customer = customer(vec![address("1", false), address("2", true)]);
        let preferred = customer.preferred_shipping_address().unwrap();
        assert_eq!(preferred.id.as_str(), "2");
    }

    #[test]
    fn test_preferred_address_falls_back_to_first() {
        let customer = customer(vec![address("1", false), address("2", false)]);
        let preferred = customer.preferred_shipping_address().unwrap();
        assert_eq!(preferred.id.as_str(), "1");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(customer(Vec::new()).full_name(), "Anna Kovács");
    }

    #[test]
    fn test_order_deserializes_from_backend_payload() {
        let order: Order = serde_json::from_value(json!({
            "id": "7",
            "code": "ABC123",
            "active": true,
            "state": "AddingItems",
            "currencyCode": "HUF",
            "totalQuantity": 2,
            "subTotalWithTax": 19950,
            "shippingWithTax": 0,
            "totalWithTax": 19950,
            "taxSummary": [],
            "shippingLines": [],
            "lines": [{
                "id": "11",
                "quantity": 2,
                "unitPriceWithTax": 9975,
                "linePriceWithTax": 19950,
                "featuredAsset": { "preview": "/assets/mug.jpg" },
                "productVariant": { "id": "3", "name": "Bögre", "sku": "MUG-1" }
            }]
        }))
        .unwrap();

        assert_eq!(order.state, OrderState::AddingItems);
        assert_eq!(order.lines.len(), 1);
        assert!(order.lines[0].connected_products.is_empty());
        assert_eq!(order.total_with_tax, MinorUnits::new(19950));
        assert!(order.selected_shipping_method().is_none());
    }
}
