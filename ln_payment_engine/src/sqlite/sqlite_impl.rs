//! `SqliteDatabase` is a concrete implementation of a settlement engine backend.
//!
//! It uses SQLite as the backend and implements the storage traits defined in the [`crate::traits`] module:
//! [`InvoiceStore`], [`LedgerPoster`] and [`ExchangeRates`].
use std::fmt::Debug;

use futures_util::stream::BoxStream;
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{db_url, exchange_rates, invoices, ledger, new_pool};
use crate::{
    db_types::{
        LedgerAccountId,
        LedgerEntry,
        LnPaymentReceipt,
        NewWalletInvoice,
        PaymentHash,
        Sats,
        WalletId,
        WalletInvoice,
    },
    settlement_api::exchange_objects::ExchangeRate,
    traits::{ExchangeRateError, ExchangeRates, InvoiceStore, InvoiceStoreError, LedgerError, LedgerPoster},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `LPG_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Brings the schema up to date. This is safe to call on every start-up.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub async fn fetch_ledger_entry(&self, payment_hash: &PaymentHash) -> Result<Option<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(|e| LedgerError::DatabaseError(e.to_string()))?;
        ledger::fetch_entry_for_payment_hash(payment_hash, &mut conn).await
    }

    pub async fn fetch_ledger_entries(&self, wallet_id: &WalletId) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(|e| LedgerError::DatabaseError(e.to_string()))?;
        ledger::fetch_entries_for_account(&LedgerAccountId::liabilities_for(wallet_id), &mut conn).await
    }

    /// The total credited to the liabilities account of `wallet_id`, net of deposit fees.
    pub async fn wallet_balance(&self, wallet_id: &WalletId) -> Result<Sats, LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(|e| LedgerError::DatabaseError(e.to_string()))?;
        ledger::account_balance(&LedgerAccountId::liabilities_for(wallet_id), &mut conn).await
    }
}

impl InvoiceStore for SqliteDatabase {
    async fn insert_invoice(&self, invoice: NewWalletInvoice) -> Result<WalletInvoice, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::insert_invoice(invoice, &mut conn).await
    }

    async fn fetch_invoice_by_payment_hash(
        &self,
        payment_hash: &PaymentHash,
    ) -> Result<Option<WalletInvoice>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::fetch_invoice_by_payment_hash(payment_hash, &mut conn).await
    }

    fn fetch_pending_invoices_for_wallet<'a>(
        &'a self,
        wallet_id: &'a WalletId,
    ) -> BoxStream<'a, Result<WalletInvoice, InvoiceStoreError>> {
        invoices::fetch_pending_invoices_for_wallet(wallet_id, &self.pool)
    }

    async fn update_invoice(&self, invoice: &WalletInvoice) -> Result<WalletInvoice, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::update_invoice(invoice, &mut conn).await
    }

    async fn delete_invoice_by_payment_hash(&self, payment_hash: &PaymentHash) -> Result<(), InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::delete_invoice_by_payment_hash(payment_hash, &mut conn).await
    }

    async fn fetch_wallets_with_pending_invoices(&self) -> Result<Vec<WalletId>, InvoiceStoreError> {
        let mut conn = self.pool.acquire().await?;
        invoices::fetch_wallets_with_pending_invoices(&mut conn).await
    }
}

impl LedgerPoster for SqliteDatabase {
    async fn receive_ln_payment(&self, receipt: LnPaymentReceipt) -> Result<(), LedgerError> {
        let mut conn = self.pool.acquire().await.map_err(|e| LedgerError::DatabaseError(e.to_string()))?;
        let account = receipt.account.clone();
        let id = ledger::insert_receipt(receipt, &mut conn).await?;
        debug!("🗃️ Credited {account} with ledger entry #{id}");
        Ok(())
    }
}

impl ExchangeRates for SqliteDatabase {
    async fn fetch_last_rate(&self, currency: &str) -> Result<ExchangeRate, ExchangeRateError> {
        let mut conn = self.pool.acquire().await.map_err(|e| ExchangeRateError::DatabaseError(e.to_string()))?;
        exchange_rates::fetch_last_rate(currency, &mut conn).await
    }

    async fn set_exchange_rate(&self, rate: &ExchangeRate) -> Result<(), ExchangeRateError> {
        let mut conn = self.pool.acquire().await.map_err(|e| ExchangeRateError::DatabaseError(e.to_string()))?;
        exchange_rates::set_exchange_rate(rate, &mut conn).await
    }
}
