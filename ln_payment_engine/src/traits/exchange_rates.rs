use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::settlement_api::exchange_objects::ExchangeRate;

#[derive(Debug, Clone, Error)]
pub enum ExchangeRateError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("The requested exchange rate does not exist: {0}")]
    RateDoesNotExist(String),
    #[error("The last {currency} rate was set at {updated_at}, which is too old to use")]
    StaleRate { currency: String, updated_at: DateTime<Utc> },
    #[error("{amount} cannot be expressed in {currency} at a rate of {rate}")]
    ConversionOverflow { currency: String, rate: String, amount: String },
}

/// Backend storage for exchange rates.
#[allow(async_fn_in_trait)]
pub trait ExchangeRates {
    /// Fetch the last exchange rate for the given currency. If the rate does not exist, the error
    /// [`ExchangeRateError::RateDoesNotExist`] is returned.
    async fn fetch_last_rate(&self, currency: &str) -> Result<ExchangeRate, ExchangeRateError>;
    /// Save the exchange rate for the given currency to the backend storage
    async fn set_exchange_rate(&self, rate: &ExchangeRate) -> Result<(), ExchangeRateError>;
}

/// Supplies the rate used to value a settlement in fiat terms.
#[allow(async_fn_in_trait)]
pub trait PriceOracle {
    async fn current_rate(&self) -> Result<ExchangeRate, ExchangeRateError>;
}
