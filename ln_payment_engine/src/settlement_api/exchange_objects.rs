use std::fmt::Display;

use chrono::{DateTime, Utc};
use lpg_common::Sats;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::traits::ExchangeRateError;

/// The value of one satoshi in a fiat currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub currency: String,
    /// Fiat units per satoshi, e.g. `0.0006` USD/sat.
    pub rate: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Create a new ExchangeRate object. If `updated_at` is not given, the current time is used.
    pub fn new(currency: String, rate: Decimal, updated_at: Option<DateTime<Utc>>) -> Self {
        let updated_at = updated_at.unwrap_or_else(Utc::now);
        Self { currency, rate, updated_at }
    }

    /// The fiat value of `amount`, i.e. `amount × rate`. Fails if the product does not fit in a `Decimal`.
    pub fn convert(&self, amount: Sats) -> Result<Decimal, ExchangeRateError> {
        Decimal::from(amount.value()).checked_mul(self.rate).ok_or_else(|| ExchangeRateError::ConversionOverflow {
            currency: self.currency.clone(),
            rate: self.rate.to_string(),
            amount: amount.to_string(),
        })
    }

    /// The age of this rate, relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now - self.updated_at
    }
}

impl Display for ExchangeRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "1 sat => {} {}", self.rate, self.currency)
    }
}
