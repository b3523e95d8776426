use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::db_types::{NewWalletInvoice, PaymentHash, WalletId, WalletInvoice};

#[derive(Debug, Clone, Error)]
pub enum InvoiceStoreError {
    #[error("We have an internal database engine (configuration/uptime etc.) : {0}")]
    DatabaseError(String),
    #[error("Cannot insert invoice, since it already exists with payment hash {0}")]
    InvoiceAlreadyExists(PaymentHash),
    #[error("The invoice with payment hash {0} does not exist")]
    InvoiceNotFound(PaymentHash),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for InvoiceStoreError {
    fn from(e: sqlx::Error) -> Self {
        InvoiceStoreError::DatabaseError(e.to_string())
    }
}

/// Persistence for wallet invoice records.
#[allow(async_fn_in_trait)]
pub trait InvoiceStore {
    /// Stores a freshly issued invoice. The invoice starts out unpaid.
    async fn insert_invoice(&self, invoice: NewWalletInvoice) -> Result<WalletInvoice, InvoiceStoreError>;

    /// Fetches the invoice with the given payment hash, or `None` if there is no such record.
    async fn fetch_invoice_by_payment_hash(
        &self,
        payment_hash: &PaymentHash,
    ) -> Result<Option<WalletInvoice>, InvoiceStoreError>;

    /// Returns a lazy, finite stream of the pending invoices for `wallet_id`. The backend decides what "pending" means.
    ///
    /// The stream can only be consumed once. An `Err` item means that enumeration itself failed.
    fn fetch_pending_invoices_for_wallet<'a>(
        &'a self,
        wallet_id: &'a WalletId,
    ) -> BoxStream<'a, Result<WalletInvoice, InvoiceStoreError>>;

    /// Persists the mutable fields of `invoice` and returns the stored record.
    ///
    /// Returns [`InvoiceStoreError::InvoiceNotFound`] if the record no longer exists.
    async fn update_invoice(&self, invoice: &WalletInvoice) -> Result<WalletInvoice, InvoiceStoreError>;

    /// Deletes the invoice with the given payment hash. Deleting a record that does not exist is not an error.
    async fn delete_invoice_by_payment_hash(&self, payment_hash: &PaymentHash) -> Result<(), InvoiceStoreError>;

    /// The ids of every wallet that has at least one pending invoice.
    async fn fetch_wallets_with_pending_invoices(&self) -> Result<Vec<WalletId>, InvoiceStoreError>;
}
