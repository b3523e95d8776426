use futures_util::{
    stream::{self, BoxStream},
    StreamExt,
};
use log::*;
use sqlx::{SqliteConnection, SqlitePool};

use super::is_unique_violation;
use crate::{
    db_types::{NewWalletInvoice, PaymentHash, WalletId, WalletInvoice},
    traits::InvoiceStoreError,
};

pub async fn insert_invoice(
    invoice: NewWalletInvoice,
    conn: &mut SqliteConnection,
) -> Result<WalletInvoice, InvoiceStoreError> {
    let payment_hash = invoice.payment_hash.clone();
    let result = sqlx::query_as(
        r#"INSERT INTO wallet_invoices (payment_hash, wallet_id, pubkey) VALUES ($1, $2, $3) RETURNING *;"#,
    )
    .bind(invoice.payment_hash)
    .bind(invoice.wallet_id)
    .bind(invoice.pubkey)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            InvoiceStoreError::InvoiceAlreadyExists(payment_hash.clone())
        } else {
            InvoiceStoreError::from(e)
        }
    })?;
    debug!("🗃️ Invoice {payment_hash} inserted");
    Ok(result)
}

pub async fn fetch_invoice_by_payment_hash(
    payment_hash: &PaymentHash,
    conn: &mut SqliteConnection,
) -> Result<Option<WalletInvoice>, InvoiceStoreError> {
    let invoice = sqlx::query_as("SELECT * FROM wallet_invoices WHERE payment_hash = $1")
        .bind(payment_hash)
        .fetch_optional(conn)
        .await?;
    Ok(invoice)
}

/// Streams the unpaid invoices of `wallet_id`, oldest first.
///
/// The rows are loaded in one query when the stream is first polled, so writes made while the stream is being
/// consumed cannot cut the enumeration short.
pub fn fetch_pending_invoices_for_wallet<'a>(
    wallet_id: &'a WalletId,
    pool: &'a SqlitePool,
) -> BoxStream<'a, Result<WalletInvoice, InvoiceStoreError>> {
    let rows = sqlx::query_as::<_, WalletInvoice>(
        r#"
            SELECT * FROM wallet_invoices
            WHERE wallet_id = $1 AND paid = FALSE
            ORDER BY created_at ASC, payment_hash ASC
        "#,
    )
    .bind(wallet_id)
    .fetch_all(pool);
    stream::once(rows)
        .map(move |result| {
            let items = match result {
                Ok(invoices) => {
                    trace!("🗃️ {} pending invoices for wallet {wallet_id}", invoices.len());
                    invoices.into_iter().map(Ok).collect::<Vec<_>>()
                },
                Err(e) => vec![Err(InvoiceStoreError::from(e))],
            };
            stream::iter(items)
        })
        .flatten()
        .boxed()
}

pub async fn update_invoice(
    invoice: &WalletInvoice,
    conn: &mut SqliteConnection,
) -> Result<WalletInvoice, InvoiceStoreError> {
    let updated: Option<WalletInvoice> = sqlx::query_as(
        r#"
            UPDATE wallet_invoices SET paid = $1, updated_at = CURRENT_TIMESTAMP
            WHERE payment_hash = $2
            RETURNING *;
        "#,
    )
    .bind(invoice.paid)
    .bind(&invoice.payment_hash)
    .fetch_optional(conn)
    .await?;
    let updated = updated.ok_or_else(|| InvoiceStoreError::InvoiceNotFound(invoice.payment_hash.clone()))?;
    trace!("🗃️ Invoice {} updated. Paid: {}", updated.payment_hash, updated.paid);
    Ok(updated)
}

pub async fn delete_invoice_by_payment_hash(
    payment_hash: &PaymentHash,
    conn: &mut SqliteConnection,
) -> Result<(), InvoiceStoreError> {
    let result = sqlx::query("DELETE FROM wallet_invoices WHERE payment_hash = $1").bind(payment_hash).execute(conn).await?;
    debug!("🗃️ Deleted {} invoice record(s) for {payment_hash}", result.rows_affected());
    Ok(())
}

pub async fn fetch_wallets_with_pending_invoices(
    conn: &mut SqliteConnection,
) -> Result<Vec<WalletId>, InvoiceStoreError> {
    let wallets: Vec<(WalletId,)> =
        sqlx::query_as("SELECT DISTINCT wallet_id FROM wallet_invoices WHERE paid = FALSE ORDER BY wallet_id")
            .fetch_all(conn)
            .await?;
    Ok(wallets.into_iter().map(|(w,)| w).collect())
}
