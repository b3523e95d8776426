use thiserror::Error;

use crate::traits::{ExchangeRateError, InvoiceLookupError, InvoiceStoreError, LedgerError, LockError};

/// Everything that can make a settlement attempt fail.
///
/// None of these are terminal for the invoice. The attempt can be retried safely, since the settlement flow
/// re-establishes idempotency on every run.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    #[error("Invoice store error. {0}")]
    StoreError(#[from] InvoiceStoreError),
    #[error("Invoice lookup failed. {0}")]
    LookupError(#[from] InvoiceLookupError),
    #[error("Could not lock the payment. {0}")]
    LockError(#[from] LockError),
    #[error("Could not fetch the exchange rate. {0}")]
    PriceError(#[from] ExchangeRateError),
    #[error("Could not credit the ledger. {0}")]
    LedgerError(#[from] LedgerError),
}
