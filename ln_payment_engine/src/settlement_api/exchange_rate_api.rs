//! The ExchangeRateApi manages the fiat exchange rate used to value settlements, and acts as the [`PriceOracle`] for
//! the settlement flow.

use std::fmt::Debug;

use chrono::{Duration, Utc};
use log::*;

use crate::{
    settlement_api::exchange_objects::ExchangeRate,
    traits::{ExchangeRateError, ExchangeRates, PriceOracle},
};

#[derive(Clone)]
pub struct ExchangeRateApi<B> {
    db: B,
    currency: String,
    max_age: Option<Duration>,
}

impl<B> Debug for ExchangeRateApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ExchangeRateApi({})", self.currency)
    }
}

impl<B> ExchangeRateApi<B>
where B: ExchangeRates
{
    /// Creates a new API instance that quotes rates in `currency`.
    pub fn new(db: B, currency: &str) -> Self {
        Self { db, currency: currency.to_uppercase(), max_age: None }
    }

    /// Rates older than `max_age` will be rejected by [`PriceOracle::current_rate`].
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub async fn fetch_last_rate(&self, currency: &str) -> Result<ExchangeRate, ExchangeRateError> {
        self.db.fetch_last_rate(&currency.to_uppercase()).await
    }

    pub async fn set_exchange_rate(&self, rate: &ExchangeRate) -> Result<(), ExchangeRateError> {
        let mut rate = rate.clone();
        rate.currency = rate.currency.to_uppercase();
        self.db.set_exchange_rate(&rate).await?;
        info!("💱️ Exchange rate updated: {rate}");
        Ok(())
    }
}

impl<B> PriceOracle for ExchangeRateApi<B>
where B: ExchangeRates
{
    async fn current_rate(&self) -> Result<ExchangeRate, ExchangeRateError> {
        let rate = self.db.fetch_last_rate(&self.currency).await?;
        match self.max_age {
            Some(max_age) if rate.age(Utc::now()) > max_age => {
                warn!("💱️ The last {} rate ({rate}) was set at {}. It is too old to use.", self.currency, rate.updated_at);
                Err(ExchangeRateError::StaleRate { currency: self.currency.clone(), updated_at: rate.updated_at })
            },
            _ => Ok(rate),
        }
    }
}
