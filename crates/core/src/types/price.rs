//! Type-safe price representation using decimal arithmetic.
//!
//! All Marom prices are Thai baht. The hosted store returns prices as JSON
//! numbers and the storefront data files hold them as numbers too, so the
//! wire format is a plain number rather than a string.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in Thai baht.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Currency symbol used for display.
    pub const SYMBOL: &'static str = "฿";

    /// ISO 4217 code.
    pub const CURRENCY_CODE: &'static str = "THB";

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from satang (hundredths of a baht).
    #[must_use]
    pub fn from_satang(satang: i64) -> Self {
        Self(Decimal::new(satang, 2))
    }

    /// The amount in baht.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Format for display (e.g. `฿1,290.00`).
    #[must_use]
    pub fn display(self) -> String {
        let rounded = self.0.round_dp(2);
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let text = format!("{:.2}", rounded.abs());
        let (whole, frac) = text.split_once('.').unwrap_or((&text, "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!(
            "{}{}{grouped}.{frac}",
            if negative { "-" } else { "" },
            Self::SYMBOL
        )
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}
