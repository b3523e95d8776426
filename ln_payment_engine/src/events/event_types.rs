use serde::{Deserialize, Serialize};

use crate::db_types::{PaymentHash, Sats, WalletId};

/// Published once, after the ledger has been credited for a settled invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceivedEvent {
    pub amount: Sats,
    pub wallet_id: WalletId,
    pub payment_hash: PaymentHash,
}

impl PaymentReceivedEvent {
    pub fn new(amount: Sats, wallet_id: WalletId, payment_hash: PaymentHash) -> Self {
        Self { amount, wallet_id, payment_hash }
    }
}
