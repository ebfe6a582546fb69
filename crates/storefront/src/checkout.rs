//! Checkout page composition.
//!
//! The checkout page needs four independent pieces of reference data from
//! the backend: delivery countries, eligible shipping methods, payment
//! methods and the logged-in customer (for their addresses). [`load`] asks
//! for all four at once and fails as a whole if any one of them fails; there
//! is no partial page. The pending order error is taken from the session
//! only after the reads succeeded, so a failed load does not swallow it.
//!
//! The active order itself does not come from here but from the
//! [`ActiveOrderCache`](crate::active_order::ActiveOrderCache); the route
//! merges both into one render.

use bolt_core::Price;
use tower_sessions::Session;
use tracing::instrument;

use crate::commerce::{
    ActiveCustomer, CommerceProvider, Country, CustomerAddress, Order, PaymentMethodQuote,
    ShippingMethodQuote, ShopContext,
};
use crate::error::Result;
use crate::models::session::take_order_error;

/// Reference data for one checkout render.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutData {
    pub countries: Vec<Country>,
    pub shipping_methods: Vec<ShippingMethodQuote>,
    pub payment_methods: Vec<PaymentMethodQuote>,
    pub customer: Option<ActiveCustomer>,
    /// Message of the last rejected order mutation, shown once.
    pub error: Option<String>,
}

/// Load the checkout reference data.
///
/// # Errors
///
/// Returns the first backend failure among the four reads, or a session
/// store error.
#[instrument(skip_all)]
pub async fn load(
    provider: &dyn CommerceProvider,
    ctx: &ShopContext,
    session: &Session,
) -> Result<CheckoutData> {
    let (countries, shipping_methods, payment_methods, customer) = tokio::try_join!(
        provider.available_countries(ctx),
        provider.eligible_shipping_methods(ctx),
        provider.eligible_payment_methods(ctx),
        provider.active_customer(ctx),
    )?;

    let error = take_order_error(session).await?;

    tracing::debug!(
        countries = countries.len(),
        shipping_methods = shipping_methods.len(),
        payment_methods = payment_methods.len(),
        has_customer = customer.is_some(),
        "Checkout data loaded"
    );

    Ok(CheckoutData {
        countries,
        shipping_methods,
        payment_methods,
        customer,
        error,
    })
}

/// Whether checkout should send the shopper back to the home page.
///
/// True when there is nothing to check out. Not enforced: the checkout
/// route only logs it.
pub struct CheckoutGuard;

impl CheckoutGuard {
    #[must_use]
    pub fn should_redirect_home(order: Option<&Order>) -> bool {
        !order.is_some_and(|order| order.active && !order.is_empty())
    }
}

// =============================================================================
// Form View
// =============================================================================

/// Shipping address form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFormValues {
    pub full_name: String,
    pub company: String,
    pub street_line1: String,
    pub street_line2: String,
    pub city: String,
    pub province: String,
    pub postal_code: String,
    pub country_code: String,
    pub phone_number: String,
}

impl From<&CustomerAddress> for AddressFormValues {
    fn from(address: &CustomerAddress) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        Self {
            full_name: text(&address.full_name),
            company: text(&address.company),
            street_line1: address.street_line1.clone(),
            street_line2: text(&address.street_line2),
            city: text(&address.city),
            province: text(&address.province),
            postal_code: text(&address.postal_code),
            country_code: address.country.code.clone(),
            phone_number: text(&address.phone_number),
        }
    }
}

/// An `<option>` of a select or radio group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormOption {
    pub value: String,
    pub label: String,
    /// Extra text (price, ineligibility reason).
    pub detail: Option<String>,
    pub selected: bool,
    pub disabled: bool,
}

/// Everything the checkout form renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutForm {
    pub address: AddressFormValues,
    pub countries: Vec<FormOption>,
    pub shipping_methods: Vec<FormOption>,
    pub payment_methods: Vec<FormOption>,
}

impl CheckoutForm {
    /// Build the form, prefilled from the customer's preferred address.
    #[must_use]
    pub fn new(data: &CheckoutData, order: Option<&Order>) -> Self {
        let mut address = data
            .customer
            .as_ref()
            .and_then(ActiveCustomer::preferred_shipping_address)
            .map(AddressFormValues::from)
            .unwrap_or_default();

        if address.full_name.is_empty()
            && let Some(customer) = &data.customer
        {
            address.full_name = customer.full_name();
        }
        if address.country_code.is_empty()
            && let Some(first) = data.countries.first()
        {
            address.country_code.clone_from(&first.code);
        }

        let currency = order.map(|order| order.currency_code).unwrap_or_default();
        let selected_method = order.and_then(Order::selected_shipping_method);

        Self {
            countries: data
                .countries
                .iter()
                .map(|country| FormOption {
                    value: country.code.clone(),
                    label: country.name.clone(),
                    detail: None,
                    selected: country.code == address.country_code,
                    disabled: false,
                })
                .collect(),
            shipping_methods: data
                .shipping_methods
                .iter()
                .map(|method| FormOption {
                    value: method.id.to_string(),
                    label: method.name.clone(),
                    detail: Some(Price::from_minor(method.price_with_tax, currency).display()),
                    selected: selected_method == Some(&method.id),
                    disabled: false,
                })
                .collect(),
            payment_methods: data
                .payment_methods
                .iter()
                .map(|method| FormOption {
                    value: method.code.clone(),
                    label: method.name.clone(),
                    detail: method.eligibility_message.clone(),
                    selected: false,
                    disabled: !method.is_eligible,
                })
                .collect(),
            address,
        }
    }
}
