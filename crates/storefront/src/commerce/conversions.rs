//! Conversions from generated shop API responses into domain types.
//!
//! Every operation module generates its own copy of the `OrderFields`
//! fragment, so the order conversion is stamped out per module.

use serde::Deserialize;
use serde::de::value::{Error as ValueError, StrDeserializer};

use super::queries::{
    adjust_order_line, get_active_customer, get_active_order, get_available_countries,
    get_eligible_payment_methods, get_eligible_shipping_methods, remove_order_line,
    set_order_shipping_address, set_order_shipping_method,
};
use super::types::{
    ActiveCustomer, AddressCountry, AddressId, Asset, Country, CountryId, CurrencyCode,
    CustomerAddress, CustomerId, Discount, Order, OrderError, OrderId, OrderLine, OrderLineId,
    OrderState, OrderUpdate, PaymentMethodId, PaymentMethodQuote, ProductVariant,
    ProductVariantId, ShippingLine, ShippingLineMethod, ShippingMethodId, ShippingMethodQuote,
    TaxLine,
};

/// Backend state name to [`OrderState`]; custom states become `Other`.
fn order_state(state: &str) -> OrderState {
    OrderState::deserialize(StrDeserializer::<ValueError>::new(state))
        .unwrap_or(OrderState::Other)
}

/// Backend quantities are never negative.
fn quantity(value: i64) -> u32 {
    u32::try_from(value).unwrap_or_default()
}

/// Convert a generated enum (`CurrencyCode`, `ErrorCode`) to its wire name.
fn enum_name<T: std::fmt::Debug>(value: &T) -> String {
    format!("{value:?}")
}

fn rejected<T: std::fmt::Debug>(error_code: &T, message: String) -> OrderUpdate {
    OrderUpdate::Rejected(OrderError {
        error_code: enum_name(error_code),
        message,
    })
}

// =============================================================================
// Reference Data
// =============================================================================

pub fn convert_countries(data: get_available_countries::ResponseData) -> Vec<Country> {
    data.available_countries
        .into_iter()
        .map(|country| Country {
            id: CountryId::new(country.id),
            code: country.code,
            name: country.name,
        })
        .collect()
}

pub fn convert_shipping_methods(
    data: get_eligible_shipping_methods::ResponseData,
) -> Vec<ShippingMethodQuote> {
    data.eligible_shipping_methods
        .into_iter()
        .map(|method| ShippingMethodQuote {
            id: ShippingMethodId::new(method.id),
            code: method.code,
            name: method.name,
            description: method.description,
            price_with_tax: method.price_with_tax,
        })
        .collect()
}

pub fn convert_payment_methods(
    data: get_eligible_payment_methods::ResponseData,
) -> Vec<PaymentMethodQuote> {
    data.eligible_payment_methods
        .into_iter()
        .map(|method| PaymentMethodQuote {
            id: PaymentMethodId::new(method.id),
            code: method.code,
            name: method.name,
            description: method.description,
            is_eligible: method.is_eligible,
            eligibility_message: method.eligibility_message,
        })
        .collect()
}

pub fn convert_customer(data: get_active_customer::ResponseData) -> Option<ActiveCustomer> {
    let customer = data.active_customer?;
    Some(ActiveCustomer {
        id: CustomerId::new(customer.id),
        first_name: customer.first_name,
        last_name: customer.last_name,
        email_address: customer.email_address,
        phone_number: customer.phone_number,
        addresses: customer
            .addresses
            .unwrap_or_default()
            .into_iter()
            .map(|address| CustomerAddress {
                id: AddressId::new(address.id),
                full_name: address.full_name,
                company: address.company,
                street_line1: address.street_line1,
                street_line2: address.street_line2,
                city: address.city,
                province: address.province,
                postal_code: address.postal_code,
                country: AddressCountry {
                    code: address.country.code,
                    name: address.country.name,
                },
                phone_number: address.phone_number,
                default_shipping_address: address.default_shipping_address.unwrap_or(false),
                default_billing_address: address.default_billing_address.unwrap_or(false),
            })
            .collect(),
    })
}

// =============================================================================
// Order
// =============================================================================

macro_rules! impl_order_from_fragment {
    ($($module:ident),+ $(,)?) => {$(
        impl From<$module::OrderFields> for Order {
            fn from(order: $module::OrderFields) -> Self {
                Self {
                    id: OrderId::new(order.id),
                    code: order.code,
                    active: order.active,
                    state: order_state(&order.state),
                    currency_code: CurrencyCode::from_code(&enum_name(&order.currency_code)),
                    total_quantity: quantity(order.total_quantity),
                    sub_total_with_tax: order.sub_total_with_tax,
                    shipping_with_tax: order.shipping_with_tax,
                    total_with_tax: order.total_with_tax,
                    tax_summary: order
                        .tax_summary
                        .into_iter()
                        .map(|line| TaxLine {
                            description: line.description,
                            tax_rate: line.tax_rate,
                            tax_base: line.tax_base,
                            tax_total: line.tax_total,
                        })
                        .collect(),
                    discounts: order
                        .discounts
                        .into_iter()
                        .map(|discount| Discount {
                            description: discount.description,
                            amount_with_tax: discount.amount_with_tax,
                        })
                        .collect(),
                    shipping_lines: order
                        .shipping_lines
                        .into_iter()
                        .map(|line| ShippingLine {
                            shipping_method: ShippingLineMethod {
                                id: ShippingMethodId::new(line.shipping_method.id),
                                name: line.shipping_method.name,
                            },
                            price_with_tax: line.price_with_tax,
                        })
                        .collect(),
                    lines: order
                        .lines
                        .into_iter()
                        .map(|line| OrderLine {
                            id: OrderLineId::new(line.id),
                            quantity: quantity(line.quantity),
                            unit_price_with_tax: line.unit_price_with_tax,
                            line_price_with_tax: line.line_price_with_tax,
                            featured_asset: line.featured_asset.map(|asset| Asset {
                                preview: asset.preview,
                            }),
                            product_variant: ProductVariant {
                                id: ProductVariantId::new(line.product_variant.id),
                                name: line.product_variant.name,
                                sku: line.product_variant.sku,
                            },
                            connected_products: Vec::new(),
                        })
                        .collect(),
                }
            }
        }
    )+};
}

impl_order_from_fragment!(
    get_active_order,
    adjust_order_line,
    remove_order_line,
    set_order_shipping_address,
    set_order_shipping_method,
);

pub fn convert_active_order(data: get_active_order::ResponseData) -> Option<Order> {
    data.active_order.map(Order::from)
}

// =============================================================================
// Mutation Results
// =============================================================================

pub fn convert_adjust_order_line(data: adjust_order_line::ResponseData) -> OrderUpdate {
    use adjust_order_line::AdjustOrderLineAdjustOrderLine as Outcome;

    match data.adjust_order_line {
        Outcome::Order(order) => OrderUpdate::Updated(Box::new(order.into())),
        Outcome::OrderModificationError(e) => rejected(&e.error_code, e.message),
        Outcome::OrderLimitError(e) => rejected(&e.error_code, e.message),
        Outcome::NegativeQuantityError(e) => rejected(&e.error_code, e.message),
        Outcome::InsufficientStockError(e) => rejected(&e.error_code, e.message),
    }
}

pub fn convert_remove_order_line(data: remove_order_line::ResponseData) -> OrderUpdate {
    use remove_order_line::RemoveOrderLineRemoveOrderLine as Outcome;

    match data.remove_order_line {
        Outcome::Order(order) => OrderUpdate::Updated(Box::new(order.into())),
        Outcome::OrderModificationError(e) => rejected(&e.error_code, e.message),
    }
}

pub fn convert_set_shipping_address(
    data: set_order_shipping_address::ResponseData,
) -> OrderUpdate {
    use set_order_shipping_address::SetOrderShippingAddressSetOrderShippingAddress as Outcome;

    match data.set_order_shipping_address {
        Outcome::Order(order) => OrderUpdate::Updated(Box::new(order.into())),
        Outcome::NoActiveOrderError(e) => rejected(&e.error_code, e.message),
    }
}

pub fn convert_set_shipping_method(data: set_order_shipping_method::ResponseData) -> OrderUpdate {
    use set_order_shipping_method::SetOrderShippingMethodSetOrderShippingMethod as Outcome;

    match data.set_order_shipping_method {
        Outcome::Order(order) => OrderUpdate::Updated(Box::new(order.into())),
        Outcome::OrderModificationError(e) => rejected(&e.error_code, e.message),
        Outcome::IneligibleShippingMethodError(e) => rejected(&e.error_code, e.message),
        Outcome::NoActiveOrderError(e) => rejected(&e.error_code, e.message),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::commerce::MinorUnits;

    fn order_json() -> serde_json::Value {
        json!({
            "id": "7",
            "code": "ABC123",
            "active": true,
            "state": "AddingItems",
            "currencyCode": "HUF",
            "totalQuantity": 2,
            "subTotalWithTax": 19950,
            "shippingWithTax": 0,
            "totalWithTax": 19950,
            "taxSummary": [
                { "description": "ÁFA", "taxRate": 27.0, "taxBase": 15709, "taxTotal": 4241 }
            ],
            "discounts": [],
            "shippingLines": [],
            "lines": [{
                "id": "11",
                "quantity": 2,
                "unitPriceWithTax": 9975,
                "linePriceWithTax": 19950,
                "featuredAsset": { "preview": "/assets/mug.jpg" },
                "productVariant": { "id": "3", "name": "Bögre", "sku": "MUG-1" }
            }]
        })
    }

    #[test]
    fn test_active_order_converts_fragment() {
        let data: get_active_order::ResponseData =
            serde_json::from_value(json!({ "activeOrder": order_json() })).unwrap();
        let order = convert_active_order(data).unwrap();

        assert_eq!(order.state, OrderState::AddingItems);
        assert_eq!(order.currency_code, CurrencyCode::HUF);
        assert_eq!(order.total_with_tax, MinorUnits::new(19950));
        assert_eq!(order.lines[0].quantity, 2);
        assert_eq!(order.lines[0].product_variant.sku, "MUG-1");
        assert_eq!(order.tax_summary[0].tax_total, MinorUnits::new(4241));
        assert!(order.selected_shipping_method().is_none());
    }

    #[test]
    fn test_no_active_order() {
        let data: get_active_order::ResponseData =
            serde_json::from_value(json!({ "activeOrder": null })).unwrap();
        assert!(convert_active_order(data).is_none());
    }

    #[test]
    fn test_custom_order_state_is_other() {
        assert_eq!(order_state("AwaitingApproval"), OrderState::Other);
        assert_eq!(order_state("ArrangingPayment"), OrderState::ArrangingPayment);
    }

    #[test]
    fn test_adjust_order_line_rejection() {
        let data: adjust_order_line::ResponseData = serde_json::from_value(json!({
            "adjustOrderLine": {
                "__typename": "InsufficientStockError",
                "errorCode": "INSUFFICIENT_STOCK_ERROR",
                "message": "Only 1 item may be added to the order due to insufficient stock"
            }
        }))
        .unwrap();

        match convert_adjust_order_line(data) {
            OrderUpdate::Rejected(error) => {
                assert_eq!(error.error_code, "INSUFFICIENT_STOCK_ERROR");
                assert!(error.message.starts_with("Only 1 item"));
            }
            OrderUpdate::Updated(_) => panic!("expected a rejection"),
        }
    }

    #[test]
    fn test_set_shipping_method_returns_order() {
        let mut order = order_json();
        order["__typename"] = json!("Order");
        order["shippingWithTax"] = json!(1490);
        order["totalWithTax"] = json!(21440);
        order["shippingLines"] = json!([
            { "shippingMethod": { "id": "1", "name": "Standard" }, "priceWithTax": 1490 }
        ]);
        let data: set_order_shipping_method::ResponseData =
            serde_json::from_value(json!({ "setOrderShippingMethod": order })).unwrap();

        match convert_set_shipping_method(data) {
            OrderUpdate::Updated(order) => {
                assert_eq!(order.total_with_tax, MinorUnits::new(21440));
                assert_eq!(
                    order.selected_shipping_method(),
                    Some(&ShippingMethodId::new("1"))
                );
            }
            OrderUpdate::Rejected(error) => panic!("unexpected rejection: {error:?}"),
        }
    }

    #[test]
    fn test_customer_address_flags_default_to_false() {
        let data: get_active_customer::ResponseData = serde_json::from_value(json!({
            "activeCustomer": {
                "id": "1",
                "firstName": "Anna",
                "lastName": "Kovács",
                "emailAddress": "anna@example.com",
                "phoneNumber": null,
                "addresses": [{
                    "id": "5",
                    "fullName": null,
                    "company": null,
                    "streetLine1": "Andrássy út 1",
                    "streetLine2": null,
                    "city": "Budapest",
                    "province": null,
                    "postalCode": "1061",
                    "country": { "code": "HU", "name": "Hungary" },
                    "phoneNumber": null,
                    "defaultShippingAddress": null,
                    "defaultBillingAddress": null
                }]
            }
        }))
        .unwrap();

        let customer = convert_customer(data).unwrap();
        assert_eq!(customer.addresses[0].city.as_deref(), Some("Budapest"));
        assert!(!customer.addresses[0].default_shipping_address);
        assert_eq!(
            customer.preferred_shipping_address().unwrap().id,
            AddressId::new("5")
        );
    }
}
