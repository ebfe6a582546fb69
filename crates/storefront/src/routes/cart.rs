//! Cart route handlers.
//!
//! Quantity changes and removals come from the line item cards via HTMX and
//! answer with the refreshed order panel fragment. A rejected change is
//! shown inline in the fragment.

use axum::{Form, extract::State};
use serde::Deserialize;
use tracing::instrument;

use super::checkout::OrderPanel;
use crate::commerce::{OrderLineId, OrderUpdate};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Shopper;
use crate::state::AppState;

/// Largest quantity accepted for one line.
const MAX_LINE_QUANTITY: u32 = 999;

/// Adjust quantity form data.
#[derive(Debug, Deserialize)]
pub struct AdjustLineForm {
    pub line_id: String,
    pub quantity: u32,
}

/// Remove line form data.
#[derive(Debug, Deserialize)]
pub struct RemoveLineForm {
    pub line_id: String,
}

/// Change the quantity of an order line (HTMX).
///
/// A quantity of zero removes the line.
#[instrument(skip(state, shopper))]
pub async fn adjust(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<AdjustLineForm>,
) -> Result<OrderPanel> {
    require_backend_session(&shopper)?;
    if form.quantity > MAX_LINE_QUANTITY {
        return Err(AppError::BadRequest(format!(
            "quantity must be at most {MAX_LINE_QUANTITY}"
        )));
    }

    let line_id = OrderLineId::new(form.line_id);
    let update = state
        .commerce()
        .adjust_order_line(&shopper.context, &line_id, form.quantity)
        .await?;
    settle(&state, &shopper, update, "Adjusted cart line").await
}

/// Remove an order line (HTMX).
#[instrument(skip(state, shopper))]
pub async fn remove(
    State(state): State<AppState>,
    shopper: Shopper,
    Form(form): Form<RemoveLineForm>,
) -> Result<OrderPanel> {
    require_backend_session(&shopper)?;

    let line_id = OrderLineId::new(form.line_id);
    let update = state
        .commerce()
        .remove_order_line(&shopper.context, &line_id)
        .await?;
    settle(&state, &shopper, update, "Removed cart line").await
}

/// Cart changes need an existing backend session; without one there is no
/// order to change.
fn require_backend_session(shopper: &Shopper) -> Result<()> {
    if shopper.context.auth_token().is_none() {
        return Err(AppError::SessionMissing);
    }
    Ok(())
}

/// Refresh the active order and render the panel.
///
/// The panel always shows the published snapshot, so a stale response from
/// an earlier change never replaces a newer one.
async fn settle(
    state: &AppState,
    shopper: &Shopper,
    update: OrderUpdate,
    action: &str,
) -> Result<OrderPanel> {
    let error = match update {
        OrderUpdate::Updated(_) => {
            add_breadcrumb("cart", action, None);
            None
        }
        OrderUpdate::Rejected(error) => {
            tracing::info!(error_code = %error.error_code, "{action}: rejected");
            Some(error.message)
        }
    };

    let order = state
        .active_orders()
        .refresh(state.commerce(), &shopper.context)
        .await?;
    shopper.persist().await?;

    Ok(OrderPanel::new(order.as_ref()).with_error(error))
}
