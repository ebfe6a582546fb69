//! Order lifecycle states reported by the commerce backend.

use serde::{Deserialize, Serialize};

/// Order state.
///
/// Maps to the backend's default order process. States added by backend
/// plugins deserialize to [`OrderState::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderState {
    #[default]
    Created,
    AddingItems,
    ArrangingPayment,
    PaymentAuthorized,
    PaymentSettled,
    PartiallyShipped,
    Shipped,
    PartiallyDelivered,
    Delivered,
    Modifying,
    ArrangingAdditionalPayment,
    Cancelled,
    #[serde(other)]
    Other,
}

impl OrderState {
    /// Whether the shopper can still change the order contents.
    #[must_use]
    pub const fn is_mutable(self) -> bool {
        matches!(
            self,
            Self::Created | Self::AddingItems | Self::ArrangingPayment
        )
    }
}

impl std::fmt::Display for OrderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Created => "Created",
            Self::AddingItems => "AddingItems",
            Self::ArrangingPayment => "ArrangingPayment",
            Self::PaymentAuthorized => "PaymentAuthorized",
            Self::PaymentSettled => "PaymentSettled",
            Self::PartiallyShipped => "PartiallyShipped",
            Self::Shipped => "Shipped",
            Self::PartiallyDelivered => "PartiallyDelivered",
            Self::Delivered => "Delivered",
            Self::Modifying => "Modifying",
            Self::ArrangingAdditionalPayment => "ArrangingAdditionalPayment",
            Self::Cancelled => "Cancelled",
            Self::Other => "Other",
        };
        f.write_str(name)
    }
}
