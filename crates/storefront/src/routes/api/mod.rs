//! JSON API routes.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use crate::commerce::Order;
use crate::error::{AppError, Result};
use crate::middleware::Shopper;
use crate::models::session::{scroll_memory, set_scroll_memory};
use crate::state::AppState;

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/active-order", get(active_order))
        .route("/scroll", post(save_scroll))
}

/// The shopper's active order, `null` without one.
#[instrument(skip_all)]
pub async fn active_order(
    State(state): State<AppState>,
    shopper: Shopper,
) -> Result<Json<Option<Order>>> {
    let order = state
        .active_orders()
        .refresh(state.commerce(), &shopper.context)
        .await?;
    shopper.persist().await?;
    Ok(Json(order))
}

/// Breadcrumb scroll offset posted when leaving a page.
#[derive(Debug, Deserialize)]
pub struct ScrollUpdate {
    pub path: String,
    pub offset: u32,
}

/// Save the breadcrumb scroll offset.
#[instrument(skip(shopper))]
pub async fn save_scroll(shopper: Shopper, Json(update): Json<ScrollUpdate>) -> Result<StatusCode> {
    if !update.path.starts_with('/') {
        return Err(AppError::BadRequest("path must be absolute".to_string()));
    }

    let mut memory = scroll_memory(&shopper.session).await?;
    memory.save(&update.path, update.offset);
    set_scroll_memory(&shopper.session, &memory).await?;
    Ok(StatusCode::NO_CONTENT)
}
