//! Active-order cache.
//!
//! Holds the shopper's current order and republishes it on every fetch.
//! Renders and cart mutations both go through [`ActiveOrderCache::refresh`];
//! subscribers read the latest [`OrderSnapshot`].
//!
//! # Ordering
//!
//! Refreshes may race (two quantity changes in quick succession). Each
//! refresh takes a sequence number when it is *issued*; its response is only
//! published if no refresh issued later has been published already. A
//! refresh that resolves after a newer one is dropped.
//!
//! Caches are kept per backend session in [`ActiveOrders`], a bounded
//! `moka` cache with idle expiry.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, instrument};

use crate::commerce::{self, CommerceProvider, Order, ShopContext};
use crate::config::ActiveOrderCacheConfig;

/// A published view of the active order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OrderSnapshot {
    /// Sequence number of the refresh that produced this snapshot; `0` until
    /// the first refresh is applied.
    pub sequence: u64,
    /// The order, or `None` when the shopper has no active order.
    pub order: Option<Order>,
}

/// Sequence number handed out when a refresh is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    /// The ticket's sequence number.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Reactive cache of one shopper's active order.
#[derive(Debug, Clone)]
pub struct ActiveOrderCache {
    inner: Arc<ActiveOrderCacheInner>,
}

#[derive(Debug)]
struct ActiveOrderCacheInner {
    issued: AtomicU64,
    snapshot: watch::Sender<OrderSnapshot>,
}

impl Default for ActiveOrderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveOrderCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        let (snapshot, _) = watch::channel(OrderSnapshot::default());
        Self {
            inner: Arc::new(ActiveOrderCacheInner {
                issued: AtomicU64::new(0),
                snapshot,
            }),
        }
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> OrderSnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Subscribe to published snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrderSnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Issue a refresh: take the next sequence number.
    #[must_use]
    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Publish `order` as the result of the refresh `ticket`.
    ///
    /// Returns `false` (and publishes nothing) when a refresh issued after
    /// `ticket` has already been published.
    pub fn apply(&self, ticket: RefreshTicket, order: Option<Order>) -> bool {
        let applied = self.inner.snapshot.send_if_modified(|current| {
            if ticket.0 <= current.sequence {
                return false;
            }
            *current = OrderSnapshot {
                sequence: ticket.0,
                order,
            };
            true
        });

        if !applied {
            debug!(sequence = ticket.0, "Discarded stale active-order response");
        }
        applied
    }

    /// Re-fetch the active order and publish it.
    ///
    /// Returns the snapshot visible after this refresh settled, which may
    /// come from a newer refresh than this one.
    ///
    /// # Errors
    ///
    /// Returns the backend error; the published snapshot is left untouched.
    #[instrument(skip_all)]
    pub async fn refresh(
        &self,
        provider: &dyn CommerceProvider,
        ctx: &ShopContext,
    ) -> commerce::Result<OrderSnapshot> {
        let ticket = self.issue();
        let order = provider.active_order(ctx).await?;
        self.apply(ticket, order);
        Ok(self.snapshot())
    }
}

/// Active-order caches keyed by backend session token.
#[derive(Clone)]
pub struct ActiveOrders {
    caches: Cache<String, ActiveOrderCache>,
}

impl ActiveOrders {
    /// Create the registry.
    #[must_use]
    pub fn new(config: ActiveOrderCacheConfig) -> Self {
        Self {
            caches: Cache::builder()
                .max_capacity(config.capacity)
                .time_to_idle(config.idle_timeout)
                .build(),
        }
    }

    /// The cache for the shopper's backend session.
    ///
    /// Returns `None` for shoppers without a backend session; they cannot
    /// have an active order.
    pub async fn for_context(&self, ctx: &ShopContext) -> Option<ActiveOrderCache> {
        let token = ctx.auth_token()?;
        Some(
            self.caches
                .get_with(token.to_string(), async { ActiveOrderCache::new() })
                .await,
        )
    }

    /// Fetch the shopper's active order and publish it.
    ///
    /// Called on every render and after every mutation.
    ///
    /// # Errors
    ///
    /// Returns the backend error of the refresh.
    pub async fn refresh(
        &self,
        provider: &dyn CommerceProvider,
        ctx: &ShopContext,
    ) -> commerce::Result<Option<Order>> {
        match self.for_context(ctx).await {
            Some(cache) => Ok(cache.refresh(provider, ctx).await?.order),
            None => Ok(None),
        }
    }
}

impl Default for ActiveOrders {
    fn default() -> Self {
        Self::new(ActiveOrderCacheConfig {
            capacity: 1_000,
            idle_timeout: Duration::from_secs(30 * 60),
        })
    }
}
