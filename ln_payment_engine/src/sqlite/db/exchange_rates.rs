use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use crate::{settlement_api::exchange_objects::ExchangeRate, traits::ExchangeRateError};

impl FromRow<'_, SqliteRow> for ExchangeRate {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let rate: String = row.try_get("rate")?;
        let rate = Decimal::from_str(&rate)
            .map_err(|e| sqlx::Error::ColumnDecode { index: "rate".to_string(), source: Box::new(e) })?;
        Ok(Self { currency: row.try_get("currency")?, rate, updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")? })
    }
}

pub async fn fetch_last_rate(currency: &str, conn: &mut SqliteConnection) -> Result<ExchangeRate, ExchangeRateError> {
    let result = sqlx::query_as(
        r#"SELECT currency, rate, updated_at FROM exchange_rates WHERE currency = $1
        ORDER BY updated_at DESC, id DESC LIMIT 1"#,
    )
    .bind(currency)
    .fetch_optional(conn)
    .await
    .map_err(|e| ExchangeRateError::DatabaseError(e.to_string()))?
    .ok_or_else(|| ExchangeRateError::RateDoesNotExist(currency.to_string()))?;
    Ok(result)
}

pub async fn set_exchange_rate(rate: &ExchangeRate, conn: &mut SqliteConnection) -> Result<(), ExchangeRateError> {
    sqlx::query(r#"INSERT INTO exchange_rates (currency, rate, updated_at) VALUES ($1, $2, $3)"#)
        .bind(&rate.currency)
        .bind(rate.rate.to_string())
        .bind(rate.updated_at)
        .execute(conn)
        .await
        .map_err(|e| ExchangeRateError::DatabaseError(e.to_string()))?;
    Ok(())
}
