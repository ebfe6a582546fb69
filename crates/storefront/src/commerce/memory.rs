//! In-memory commerce backend for tests.
//!
//! Serves fixed reference data and keeps one order that mutations update the
//! way the real backend would (line prices and totals are recomputed here, on
//! the "backend" side). Individual operations can be made to fail.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::types::{
    ActiveCustomer, AddressInput, Asset, Country, CountryId, CurrencyCode, MinorUnits, Order,
    OrderError, OrderId, OrderLine, OrderLineId, OrderState, OrderUpdate, PaymentMethodQuote,
    ProductVariant, ProductVariantId, ShippingLine, ShippingLineMethod, ShippingMethodId,
    ShippingMethodQuote,
};
use super::{CommerceError, CommerceProvider, Result, ShopContext};

/// Backend operations, used to inject failures and count calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    AvailableCountries,
    EligibleShippingMethods,
    EligiblePaymentMethods,
    ActiveCustomer,
    ActiveOrder,
    AdjustOrderLine,
    RemoveOrderLine,
    SetOrderShippingAddress,
    SetOrderShippingMethod,
}

/// Data served by [`InMemoryCommerce`].
#[derive(Debug, Clone, Default)]
pub struct Fixture {
    pub countries: Vec<Country>,
    pub shipping_methods: Vec<ShippingMethodQuote>,
    pub payment_methods: Vec<PaymentMethodQuote>,
    pub customer: Option<ActiveCustomer>,
    pub order: Option<Order>,
    /// Token handed to shoppers that call without one.
    pub issue_token: Option<String>,
}

#[derive(Debug, Default)]
struct Backend {
    fixture: Fixture,
    failing: HashMap<Operation, FailureMode>,
    reject_next: Option<OrderError>,
    shipping_address: Option<AddressInput>,
    calls: HashMap<Operation, usize>,
}

#[derive(Debug, Clone, Copy)]
enum FailureMode {
    Unavailable,
    Backend,
}

/// A [`CommerceProvider`] backed by a [`Fixture`].
#[derive(Debug, Default)]
pub struct InMemoryCommerce {
    backend: Mutex<Backend>,
}

impl InMemoryCommerce {
    /// Serve the given fixture.
    #[must_use]
    pub fn new(fixture: Fixture) -> Self {
        Self {
            backend: Mutex::new(Backend {
                fixture,
                ..Backend::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Backend> {
        self.backend
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Make `operation` fail with a network-style error.
    pub fn fail_unavailable(&self, operation: Operation) {
        self.lock()
            .failing
            .insert(operation, FailureMode::Unavailable);
    }

    /// Make `operation` fail with a backend error response.
    pub fn fail_backend(&self, operation: Operation) {
        self.lock().failing.insert(operation, FailureMode::Backend);
    }

    /// Reject the next order mutation with `error`.
    pub fn reject_next_mutation(&self, error_code: &str, message: &str) {
        self.lock().reject_next = Some(OrderError {
            error_code: error_code.to_string(),
            message: message.to_string(),
        });
    }

    /// Replace the stored order.
    pub fn set_order(&self, order: Option<Order>) {
        self.lock().fixture.order = order;
    }

    /// Current stored order.
    #[must_use]
    pub fn order(&self) -> Option<Order> {
        self.lock().fixture.order.clone()
    }

    /// Last shipping address set on the order.
    #[must_use]
    pub fn shipping_address(&self) -> Option<AddressInput> {
        self.lock().shipping_address.clone()
    }

    /// How many times `operation` was called.
    #[must_use]
    pub fn calls(&self, operation: Operation) -> usize {
        self.lock().calls.get(&operation).copied().unwrap_or(0)
    }

    /// Bookkeeping shared by every call: count it, hand out a token, fail
    /// it if configured to.
    fn enter(&self, ctx: &ShopContext, operation: Operation) -> Result<MutexGuard<'_, Backend>> {
        let mut backend = self.lock();
        *backend.calls.entry(operation).or_insert(0) += 1;

        if ctx.auth_token().is_none()
            && let Some(token) = &backend.fixture.issue_token
        {
            ctx.record_issued_token(token);
        }

        match backend.failing.get(&operation) {
            Some(FailureMode::Unavailable) => Err(CommerceError::Unavailable(format!(
                "{operation:?}: connection refused"
            ))),
            Some(FailureMode::Backend) => Err(CommerceError::Status {
                status: 500,
                body: format!("{operation:?}: internal server error"),
            }),
            None => Ok(backend),
        }
    }

    /// Apply a mutation to the stored order unless a rejection is queued.
    fn mutate(
        &self,
        ctx: &ShopContext,
        operation: Operation,
        apply: impl FnOnce(&mut Backend) -> std::result::Result<(), OrderError>,
    ) -> Result<OrderUpdate> {
        let mut backend = self.enter(ctx, operation)?;

        if let Some(error) = backend.reject_next.take() {
            return Ok(OrderUpdate::Rejected(error));
        }
        if backend.fixture.order.is_none() {
            return Ok(OrderUpdate::Rejected(OrderError {
                error_code: "NO_ACTIVE_ORDER_ERROR".to_string(),
                message: "There is no active Order associated with the current session"
                    .to_string(),
            }));
        }
        if let Err(error) = apply(&mut *backend) {
            return Ok(OrderUpdate::Rejected(error));
        }

        let Some(order) = backend.fixture.order.as_mut() else {
            return Ok(OrderUpdate::Rejected(OrderError {
                error_code: "NO_ACTIVE_ORDER_ERROR".to_string(),
                message: "There is no active Order associated with the current session"
                    .to_string(),
            }));
        };
        recompute_totals(order);
        Ok(OrderUpdate::Updated(Box::new(order.clone())))
    }
}

/// Recompute line prices and order totals the way the backend does.
fn recompute_totals(order: &mut Order) {
    for line in &mut order.lines {
        line.line_price_with_tax =
            MinorUnits::new(line.unit_price_with_tax.value() * i64::from(line.quantity));
    }
    let subtotal: i64 = order
        .lines
        .iter()
        .map(|line| line.line_price_with_tax.value())
        .sum();
    let discounts: i64 = order
        .discounts
        .iter()
        .map(|discount| discount.amount_with_tax.value())
        .sum();

    order.total_quantity = order.lines.iter().map(|line| line.quantity).sum();
    order.sub_total_with_tax = MinorUnits::new(subtotal);
    order.total_with_tax =
        MinorUnits::new(subtotal + order.shipping_with_tax.value() + discounts);
}

fn line_not_found(line_id: &OrderLineId) -> OrderError {
    OrderError {
        error_code: "ORDER_LINE_NOT_FOUND".to_string(),
        message: format!("No order line with id {line_id}"),
    }
}

#[async_trait]
impl CommerceProvider for InMemoryCommerce {
    async fn available_countries(&self, ctx: &ShopContext) -> Result<Vec<Country>> {
        let backend = self.enter(ctx, Operation::AvailableCountries)?;
        Ok(backend.fixture.countries.clone())
    }

    async fn eligible_shipping_methods(
        &self,
        ctx: &ShopContext,
    ) -> Result<Vec<ShippingMethodQuote>> {
        let backend = self.enter(ctx, Operation::EligibleShippingMethods)?;
        Ok(backend.fixture.shipping_methods.clone())
    }

    async fn eligible_payment_methods(&self, ctx: &ShopContext) -> Result<Vec<PaymentMethodQuote>> {
        let backend = self.enter(ctx, Operation::EligiblePaymentMethods)?;
        Ok(backend.fixture.payment_methods.clone())
    }

    async fn active_customer(&self, ctx: &ShopContext) -> Result<Option<ActiveCustomer>> {
        let backend = self.enter(ctx, Operation::ActiveCustomer)?;
        Ok(backend.fixture.customer.clone())
    }

    async fn active_order(&self, ctx: &ShopContext) -> Result<Option<Order>> {
        let backend = self.enter(ctx, Operation::ActiveOrder)?;
        Ok(backend.fixture.order.clone())
    }

    async fn adjust_order_line(
        &self,
        ctx: &ShopContext,
        line_id: &OrderLineId,
        quantity: u32,
    ) -> Result<OrderUpdate> {
        self.mutate(ctx, Operation::AdjustOrderLine, |backend| {
            let order = backend.fixture.order.as_mut().ok_or_else(|| line_not_found(line_id))?;
            let line = order
                .lines
                .iter_mut()
                .find(|line| &line.id == line_id)
                .ok_or_else(|| line_not_found(line_id))?;
            line.quantity = quantity;
            order.lines.retain(|line| line.quantity > 0);
            Ok(())
        })
    }

    async fn remove_order_line(
        &self,
        ctx: &ShopContext,
        line_id: &OrderLineId,
    ) -> Result<OrderUpdate> {
        self.mutate(ctx, Operation::RemoveOrderLine, |backend| {
            let order = backend.fixture.order.as_mut().ok_or_else(|| line_not_found(line_id))?;
            let before = order.lines.len();
            order.lines.retain(|line| &line.id != line_id);
            if order.lines.len() == before {
                return Err(line_not_found(line_id));
            }
            Ok(())
        })
    }

    async fn set_order_shipping_address(
        &self,
        ctx: &ShopContext,
        address: &AddressInput,
    ) -> Result<OrderUpdate> {
        self.mutate(ctx, Operation::SetOrderShippingAddress, |backend| {
            backend.shipping_address = Some(address.clone());
            Ok(())
        })
    }

    async fn set_order_shipping_method(
        &self,
        ctx: &ShopContext,
        method_id: &ShippingMethodId,
    ) -> Result<OrderUpdate> {
        self.mutate(ctx, Operation::SetOrderShippingMethod, |backend| {
            let quote = backend
                .fixture
                .shipping_methods
                .iter()
                .find(|quote| &quote.id == method_id)
                .cloned()
                .ok_or_else(|| OrderError {
                    error_code: "INELIGIBLE_SHIPPING_METHOD_ERROR".to_string(),
                    message: "This Order is not eligible for the selected ShippingMethod"
                        .to_string(),
                })?;
            if let Some(order) = backend.fixture.order.as_mut() {
                order.shipping_with_tax = quote.price_with_tax;
                order.shipping_lines = vec![ShippingLine {
                    shipping_method: ShippingLineMethod {
                        id: quote.id,
                        name: quote.name,
                    },
                    price_with_tax: quote.price_with_tax,
                }];
            }
            Ok(())
        })
    }
}

// =============================================================================
// Fixture Builders
// =============================================================================

/// An active order with one line per `(quantity, unit price)` pair and no
/// shipping, tax lines or discounts.
#[must_use]
pub fn order_with_lines(lines: &[(u32, i64)]) -> Order {
    let mut order = Order {
        id: OrderId::new("1"),
        code: "BOLT0001".to_string(),
        active: true,
        state: OrderState::AddingItems,
        currency_code: CurrencyCode::HUF,
        total_quantity: 0,
        sub_total_with_tax: MinorUnits::ZERO,
        shipping_with_tax: MinorUnits::ZERO,
        total_with_tax: MinorUnits::ZERO,
        tax_summary: Vec::new(),
        discounts: Vec::new(),
        shipping_lines: Vec::new(),
        lines: lines
            .iter()
            .enumerate()
            .map(|(index, &(quantity, unit_price))| {
                let n = index + 1;
                OrderLine {
                    id: OrderLineId::new(format!("line-{n}")),
                    quantity,
                    unit_price_with_tax: MinorUnits::new(unit_price),
                    line_price_with_tax: MinorUnits::ZERO,
                    featured_asset: Some(Asset {
                        preview: format!("/assets/variant-{n}.jpg"),
                    }),
                    product_variant: ProductVariant {
                        id: ProductVariantId::new(format!("variant-{n}")),
                        name: format!("Product {n}"),
                        sku: format!("SKU-{n}"),
                    },
                    connected_products: Vec::new(),
                }
            })
            .collect(),
    };
    recompute_totals(&mut order);
    order
}

/// A country entry.
#[must_use]
pub fn country(id: &str, code: &str, name: &str) -> Country {
    Country {
        id: CountryId::new(id),
        code: code.to_string(),
        name: name.to_string(),
    }
}

/// A shipping method quote.
#[must_use]
pub fn shipping_method(id: &str, name: &str, price_with_tax: i64) -> ShippingMethodQuote {
    ShippingMethodQuote {
        id: ShippingMethodId::new(id),
        code: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        description: String::new(),
        price_with_tax: MinorUnits::new(price_with_tax),
    }
}

/// An eligible payment method quote.
#[must_use]
pub fn payment_method(id: &str, name: &str) -> PaymentMethodQuote {
    PaymentMethodQuote {
        id: super::types::PaymentMethodId::new(id),
        code: name.to_lowercase().replace(' ', "-"),
        name: name.to_string(),
        description: String::new(),
        is_eligible: true,
        eligibility_message: None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_with_lines_totals() {
        let order = order_with_lines(&[(2, 9975)]);
        assert_eq!(order.sub_total_with_tax, MinorUnits::new(19950));
        assert_eq!(order.total_with_tax, MinorUnits::new(19950));
        assert_eq!(order.total_quantity, 2);
    }

    #[tokio::test]
    async fn test_adjust_line_recomputes_totals() {
        let backend = InMemoryCommerce::new(Fixture {
            order: Some(order_with_lines(&[(1, 1000), (1, 500)])),
            ..Fixture::default()
        });
        let ctx = ShopContext::default();

        let update = backend
            .adjust_order_line(&ctx, &OrderLineId::new("line-1"), 3)
            .await
            .unwrap();

        match update {
            OrderUpdate::Updated(order) => {
                assert_eq!(order.sub_total_with_tax, MinorUnits::new(3500));
                assert_eq!(order.total_quantity, 4);
            }
            OrderUpdate::Rejected(error) => panic!("unexpected rejection: {error:?}"),
        }
    }

    #[tokio::test]
    async fn test_mutation_without_order_is_rejected() {
        let backend = InMemoryCommerce::default();
        let update = backend
            .remove_order_line(&ShopContext::default(), &OrderLineId::new("line-1"))
            .await
            .unwrap();
        assert!(matches!(
            update,
            OrderUpdate::Rejected(e) if e.error_code == "NO_ACTIVE_ORDER_ERROR"
        ));
    }

    #[tokio::test]
    async fn test_failure_injection_and_token_issue() {
        let backend = InMemoryCommerce::new(Fixture {
            issue_token: Some("tok".to_string()),
            ..Fixture::default()
        });
        backend.fail_unavailable(Operation::AvailableCountries);

        let ctx = ShopContext::default();
        let err = backend.available_countries(&ctx).await.unwrap_err();
        assert!(matches!(err, CommerceError::Unavailable(_)));
        assert_eq!(ctx.issued_token(), Some("tok"));
        assert_eq!(backend.calls(Operation::AvailableCountries), 1);
    }
}
