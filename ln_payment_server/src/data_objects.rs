use std::fmt::Display;

use ln_payment_engine::ExchangeRate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleResponse {
    pub settled: bool,
}

/// Sets the value of one satoshi in `currency`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateUpdate {
    pub currency: String,
    pub rate: Decimal,
}

impl From<ExchangeRateUpdate> for ExchangeRate {
    fn from(value: ExchangeRateUpdate) -> Self {
        ExchangeRate::new(value.currency.to_uppercase(), value.rate, None)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeRateResult {
    pub currency: String,
    pub rate: Decimal,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ExchangeRate> for ExchangeRateResult {
    fn from(value: ExchangeRate) -> Self {
        Self { currency: value.currency, rate: value.rate, updated_at: value.updated_at }
    }
}
