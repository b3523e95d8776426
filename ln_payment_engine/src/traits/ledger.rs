use thiserror::Error;

use crate::db_types::{LnPaymentReceipt, PaymentHash};

#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    #[error("Ledger database error: {0}")]
    DatabaseError(String),
    #[error("A ledger entry for payment hash {0} has already been recorded")]
    DuplicateEntry(PaymentHash),
}

/// The ledger side of a settlement.
///
/// The ledger owns its own accounting rules. Callers are responsible for only posting a receipt once per payment hash.
#[allow(async_fn_in_trait)]
pub trait LedgerPoster {
    /// Credit `receipt.account` with the received amount, net of `receipt.fee`.
    async fn receive_ln_payment(&self, receipt: LnPaymentReceipt) -> Result<(), LedgerError>;
}
