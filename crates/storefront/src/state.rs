//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::active_order::ActiveOrders;
use crate::commerce::CommerceProvider;
use crate::components::PrimaryMenu;
use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    commerce: Arc<dyn CommerceProvider>,
    active_orders: ActiveOrders,
    primary_menu: PrimaryMenu,
}

impl AppState {
    /// Create the application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool (sessions, readiness)
    /// * `commerce` - Commerce backend
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        pool: PgPool,
        commerce: Arc<dyn CommerceProvider>,
    ) -> Self {
        let active_orders = ActiveOrders::new(config.active_orders);
        let primary_menu = PrimaryMenu::from_config(&config.primary_menu);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                commerce,
                active_orders,
                primary_menu,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get the commerce backend.
    #[must_use]
    pub fn commerce(&self) -> &dyn CommerceProvider {
        self.inner.commerce.as_ref()
    }

    /// Get the per-shopper active-order caches.
    #[must_use]
    pub fn active_orders(&self) -> &ActiveOrders {
        &self.inner.active_orders
    }

    /// Get the primary menu built from configuration.
    #[must_use]
    pub fn primary_menu(&self) -> &PrimaryMenu {
        &self.inner.primary_menu
    }
}
