//! Type-safe price representation using decimal arithmetic.
//!
//! The commerce backend transmits every monetary value as an integer number
//! of minor units (e.g. `9975` is `99.75`), always with two implied decimal
//! places regardless of currency. [`MinorUnits`] carries that raw value;
//! [`Price`] is the display-side decimal form.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Number of implied decimal places in backend amounts.
const MINOR_UNIT_SCALE: u32 = 2;

/// Raw backend amount in minor units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw minor-unit value.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw minor-unit value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., forints, not fillér).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from a backend minor-unit amount.
    #[must_use]
    pub fn from_minor(amount: MinorUnits, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(amount.value(), MINOR_UNIT_SCALE),
            currency_code,
        }
    }

    /// Format for display (e.g., "199.50 Ft", "€12.00").
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount.round_dp(MINOR_UNIT_SCALE);
        match self.currency_code.symbol_position() {
            SymbolPosition::Prefix => format!("{}{amount:.2}", self.currency_code.symbol()),
            SymbolPosition::Suffix => format!("{amount:.2} {}", self.currency_code.symbol()),
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Where the currency symbol goes relative to the amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    Prefix,
    Suffix,
}

/// ISO 4217 currency codes the storefront knows how to display.
///
/// Unknown codes deserialize to [`CurrencyCode::Other`] and are displayed
/// without a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    HUF,
    EUR,
    USD,
    GBP,
    CHF,
    CZK,
    PLN,
    RON,
    #[serde(other)]
    Other,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::HUF => "Ft",
            Self::EUR => "€",
            Self::USD => "$",
            Self::GBP => "£",
            Self::CHF => "CHF",
            Self::CZK => "Kč",
            Self::PLN => "zł",
            Self::RON => "lei",
            Self::Other => "",
        }
    }

    /// Parse a three-letter code; unknown codes become [`CurrencyCode::Other`].
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "HUF" => Self::HUF,
            "EUR" => Self::EUR,
            "USD" => Self::USD,
            "GBP" => Self::GBP,
            "CHF" => Self::CHF,
            "CZK" => Self::CZK,
            "PLN" => Self::PLN,
            "RON" => Self::RON,
            _ => Self::Other,
        }
    }

    /// Three-letter currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::HUF => "HUF",
            Self::EUR => "EUR",
            Self::USD => "USD",
            Self::GBP => "GBP",
            Self::CHF => "CHF",
            Self::CZK => "CZK",
            Self::PLN => "PLN",
            Self::RON => "RON",
            Self::Other => "XXX",
        }
    }

    const fn symbol_position(self) -> SymbolPosition {
        match self {
            Self::EUR | Self::USD | Self::GBP => SymbolPosition::Prefix,
            _ => SymbolPosition::Suffix,
        }
    }
}
