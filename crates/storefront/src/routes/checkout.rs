//! Checkout route handlers.
//!
//! The page is two panes: the order form (address, shipping, payment) and
//! the order panel (line items and summary). Form posts redirect back to the
//! page; a rejected mutation's message travels to the next render through
//! the session.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::checkout::{self, CheckoutForm, CheckoutGuard};
use crate::commerce::{AddressInput, Order, OrderUpdate, ShippingMethodId};
use crate::components::{
    BreadcrumbItem, Breadcrumbs, LineItemCard, OrderSummary, PageTitle, PrimaryMenu, RenderMode,
    UserCard, UserCardProps,
};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::middleware::Shopper;
use crate::models::session::{scroll_memory, set_order_error};
use crate::state::AppState;

const CHECKOUT_PATH: &str = "/checkout";

// =============================================================================
// Templates
// =============================================================================

/// The order pane: line items and summary. Also served alone as the HTMX
/// fragment of the cart routes.
#[derive(Debug, Clone, Template, WebTemplate)]
#[template(path = "partials/order_panel.html")]
pub struct OrderPanel {
    pub cards: Vec<LineItemCard>,
    pub summary: Option<OrderSummary>,
    /// Inline message of a rejected cart change.
    pub error: Option<String>,
}

impl OrderPanel {
    #[must_use]
    pub fn new(order: Option<&Order>) -> Self {
        let Some(order) = order.filter(|order| !order.is_empty()) else {
            return Self {
                cards: Vec::new(),
                summary: None,
                error: None,
            };
        };

        Self {
            cards: order
                .lines
                .iter()
                .map(|line| LineItemCard::new(line, order.currency_code))
                .collect(),
            summary: Some(OrderSummary::from_order(order)),
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutShowTemplate {
    pub primary_menu: PrimaryMenu,
    pub page_title: PageTitle,
    pub breadcrumbs: Breadcrumbs,
    pub customer_card: Option<UserCard>,
    pub form: CheckoutForm,
    pub panel: OrderPanel,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the checkout page.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, shopper: Shopper) -> Result<Response> {
    let data = checkout::load(state.commerce(), &shopper.context, &shopper.session).await?;
    let order = state
        .active_orders()
        .refresh(state.commerce(), &shopper.context)
        .await?;
    shopper.persist().await?;

    if CheckoutGuard::should_redirect_home(order.as_ref()) {
        tracing::debug!("No active order to check out; rendering checkout anyway");
    }

    let memory = scroll_memory(&shopper.session).await?;
    let breadcrumbs = Breadcrumbs::new(
        vec![
            BreadcrumbItem::new("home", "Home", "/"),
            BreadcrumbItem::new("checkout", "Checkout", CHECKOUT_PATH),
        ],
        CHECKOUT_PATH,
        &memory,
    );

    Ok(CheckoutShowTemplate {
        primary_menu: state.primary_menu().clone(),
        page_title: PageTitle::screen_reader_only("Checkout"),
        breadcrumbs,
        customer_card: data
            .customer
            .as_ref()
            .map(|customer| UserCard::new(UserCardProps::from(customer), RenderMode::Production)),
        form: CheckoutForm::new(&data, order.as_ref()),
        panel: OrderPanel::new(order.as_ref()),
        error: data.error,
    }
    .into_response())
}

/// Shipping address form data.
#[derive(Debug, Deserialize)]
pub struct ShippingAddressForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub company: String,
    pub street_line1: String,
    #[serde(default)]
    pub street_line2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub postal_code: String,
    pub country_code: String,
    #[serde(default)]
    pub phone_number: String,
}

impl From<ShippingAddressForm> for AddressInput {
    fn from(form: ShippingAddressForm) -> Self {
        let optional = |value: String| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        Self {
            full_name: optional(form.full_name),
            company: optional(form.company),
            street_line1: form.street_line1.trim().to_string(),
            street_line2: optional(form.street_line2),
            city: optional(form.city),
            province: optional(form.province),
            postal_code: optional(form.postal_code),
            country_code: form.country_code.trim().to_string(),
            phone_number: optional(form.phone_number),
        }
    }
}

/// Set the order's shipping address.
#[instrument(skip_all)]
pub async fn set_shipping_address(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<ShippingAddressForm>,
) -> Result<Redirect> {
    let address = AddressInput::from(form);
    let update = state
        .commerce()
        .set_order_shipping_address(&shopper.context, &address)
        .await?;
    settle(&state, &shopper, update, "Set shipping address").await?;
    Ok(Redirect::to(CHECKOUT_PATH))
}

/// Shipping method form data.
#[derive(Debug, Deserialize)]
pub struct ShippingMethodForm {
    pub shipping_method_id: String,
}

/// Select the order's shipping method.
#[instrument(skip_all)]
pub async fn set_shipping_method(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<ShippingMethodForm>,
) -> Result<Redirect> {
    let method_id = ShippingMethodId::new(form.shipping_method_id);
    let update = state
        .commerce()
        .set_order_shipping_method(&shopper.context, &method_id)
        .await?;
    settle(&state, &shopper, update, "Set shipping method").await?;
    Ok(Redirect::to(CHECKOUT_PATH))
}

/// Apply a mutation's outcome before redirecting back to the page.
///
/// Success refreshes the active order; a rejection is kept in the session
/// for the next render.
async fn settle(
    state: &AppState,
    shopper: &Shopper,
    update: OrderUpdate,
    action: &str,
) -> Result<()> {
    match update {
        OrderUpdate::Updated(_) => {
            add_breadcrumb("checkout", action, None);
            state
                .active_orders()
                .refresh(state.commerce(), &shopper.context)
                .await?;
        }
        OrderUpdate::Rejected(error) => {
            tracing::info!(error_code = %error.error_code, "{action} rejected");
            set_order_error(&shopper.session, &error.message).await?;
        }
    }
    shopper.persist().await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commerce::memory::order_with_lines;

    #[test]
    fn test_empty_order_panel() {
        let html = OrderPanel::new(Some(&order_with_lines(&[]))).render().unwrap();
        assert!(html.contains(r#"id="order-panel""#));
        assert!(html.contains("Your cart is empty"));
    }

    #[test]
    fn test_order_panel_shows_backend_totals() {
        let html = OrderPanel::new(Some(&order_with_lines(&[(2, 9975)])))
            .render()
            .unwrap();
        assert!(html.contains("Product 1"));
        assert_eq!(html.matches("199.50 Ft").count(), 3);
    }

    #[test]
    fn test_address_form_blank_fields_become_none() {
        let input = AddressInput::from(ShippingAddressForm {
            full_name: "Anna Kovács".to_string(),
            company: "  ".to_string(),
            street_line1: " Andrássy út 1 ".to_string(),
            street_line2: String::new(),
            city: "Budapest".to_string(),
            province: String::new(),
            postal_code: "1061".to_string(),
            country_code: "HU".to_string(),
            phone_number: String::new(),
        });

        assert_eq!(input.street_line1, "Andrássy út 1");
        assert_eq!(input.company, None);
        assert_eq!(input.city.as_deref(), Some("Budapest"));
        assert_eq!(input.phone_number, None);
    }
}
