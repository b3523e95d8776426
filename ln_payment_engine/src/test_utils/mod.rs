//! Test support: in-memory collaborators and SQLite fixtures.
mod fakes;
mod memory_store;
#[cfg(feature = "sqlite")]
pub mod prepare_env;

use std::str::FromStr;

use chrono::Utc;
pub use fakes::{FakeNode, FixedPriceOracle, MemoryLedger};
pub use memory_store::MemoryInvoiceStore;

use crate::db_types::{NodePubkey, PaymentHash, WalletId, WalletInvoice};

/// A deterministic payment hash built from a single seed byte.
pub fn payment_hash(seed: u8) -> PaymentHash {
    PaymentHash::from_str(&format!("{seed:02x}").repeat(32)).expect("valid payment hash")
}

pub fn node_pubkey() -> NodePubkey {
    NodePubkey::from_str("02c0ffee00000000000000000000000000000000000000000000000000000000ff").expect("valid node key")
}

pub fn wallet_id(id: &str) -> WalletId {
    WalletId::from_str(id).expect("valid wallet id")
}

pub fn unpaid_invoice(payment_hash: PaymentHash, wallet_id: WalletId) -> WalletInvoice {
    let now = Utc::now();
    WalletInvoice { payment_hash, wallet_id, pubkey: node_pubkey(), paid: false, created_at: now, updated_at: now }
}
