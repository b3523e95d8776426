use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::*;
use rust_decimal::Decimal;
use sqlx::{sqlite::SqliteRow, FromRow, Row, SqliteConnection};

use super::is_unique_violation;
use crate::{
    db_types::{LedgerAccountId, LedgerEntry, LnPaymentReceipt, PaymentHash, Sats},
    traits::LedgerError,
};

fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let text: String = row.try_get(column)?;
    Decimal::from_str(&text).map_err(|e| sqlx::Error::ColumnDecode { index: column.to_string(), source: Box::new(e) })
}

impl FromRow<'_, SqliteRow> for LedgerEntry {
    fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        let receipt = LnPaymentReceipt {
            account: row.try_get::<LedgerAccountId, _>("account")?,
            payment_hash: row.try_get::<PaymentHash, _>("payment_hash")?,
            description: row.try_get("description")?,
            amount: Sats::from(row.try_get::<i64, _>("amount")?),
            fee: Sats::from(row.try_get::<i64, _>("fee")?),
            fiat_amount: decimal_column(row, "fiat_amount")?,
            fiat_fee: decimal_column(row, "fiat_fee")?,
        };
        Ok(Self { id: row.try_get("id")?, receipt, created_at: row.try_get::<DateTime<Utc>, _>("created_at")? })
    }
}

pub async fn insert_receipt(receipt: LnPaymentReceipt, conn: &mut SqliteConnection) -> Result<i64, LedgerError> {
    let payment_hash = receipt.payment_hash.clone();
    let (id,): (i64,) = sqlx::query_as(
        r#"
            INSERT INTO ledger_entries (account, payment_hash, description, amount, fee, fiat_amount, fiat_fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id;
        "#,
    )
    .bind(receipt.account)
    .bind(receipt.payment_hash)
    .bind(receipt.description)
    .bind(receipt.amount.value())
    .bind(receipt.fee.value())
    .bind(receipt.fiat_amount.to_string())
    .bind(receipt.fiat_fee.to_string())
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            LedgerError::DuplicateEntry(payment_hash.clone())
        } else {
            LedgerError::DatabaseError(e.to_string())
        }
    })?;
    debug!("🗃️ Ledger entry #{id} recorded for {payment_hash}");
    Ok(id)
}

pub async fn fetch_entry_for_payment_hash(
    payment_hash: &PaymentHash,
    conn: &mut SqliteConnection,
) -> Result<Option<LedgerEntry>, LedgerError> {
    sqlx::query_as("SELECT * FROM ledger_entries WHERE payment_hash = $1")
        .bind(payment_hash)
        .fetch_optional(conn)
        .await
        .map_err(|e| LedgerError::DatabaseError(e.to_string()))
}

pub async fn fetch_entries_for_account(
    account: &LedgerAccountId,
    conn: &mut SqliteConnection,
) -> Result<Vec<LedgerEntry>, LedgerError> {
    sqlx::query_as("SELECT * FROM ledger_entries WHERE account = $1 ORDER BY id ASC")
        .bind(account)
        .fetch_all(conn)
        .await
        .map_err(|e| LedgerError::DatabaseError(e.to_string()))
}

/// The net balance credited to `account`, i.e. the sum of the amounts received less fees.
pub async fn account_balance(account: &LedgerAccountId, conn: &mut SqliteConnection) -> Result<Sats, LedgerError> {
    let (balance,): (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(amount - fee), 0) FROM ledger_entries WHERE account = $1")
            .bind(account)
            .fetch_one(conn)
            .await
            .map_err(|e| LedgerError::DatabaseError(e.to_string()))?;
    Ok(Sats::from(balance))
}
