//! Data types shared between the settlement API and its backends.
use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
pub use lpg_common::Sats;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConversionError {
    #[error("Invalid payment hash. {0}")]
    InvalidPaymentHash(String),
    #[error("Invalid node public key. {0}")]
    InvalidNodePubkey(String),
    #[error("Wallet ids cannot be empty")]
    EmptyWalletId,
}

fn hex_of_len(s: &str, len: usize) -> Option<String> {
    let s = s.trim();
    (s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit())).then(|| s.to_ascii_lowercase())
}

//--------------------------------------     PaymentHash     ---------------------------------------------------------
/// The SHA-256 payment hash of a Lightning invoice, as 64 lowercase hex characters.
///
/// This is the correlation key between the node, the invoice store and the payment lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct PaymentHash(String);

impl PaymentHash {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PaymentHash {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_of_len(s, 64)
            .map(Self)
            .ok_or_else(|| ConversionError::InvalidPaymentHash(format!("'{s}' is not 32 bytes of hex")))
    }
}

impl TryFrom<String> for PaymentHash {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PaymentHash> for String {
    fn from(value: PaymentHash) -> Self {
        value.0
    }
}

impl Display for PaymentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------       WalletId      ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct WalletId(String);

impl WalletId {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for WalletId {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(ConversionError::EmptyWalletId)
        } else {
            Ok(Self(s.to_string()))
        }
    }
}

impl TryFrom<String> for WalletId {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WalletId> for String {
    fn from(value: WalletId) -> Self {
        value.0
    }
}

impl Display for WalletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------      NodePubkey     ---------------------------------------------------------
/// The identity (compressed secp256k1 public key) of the Lightning node that issued an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(try_from = "String", into = "String")]
pub struct NodePubkey(String);

impl NodePubkey {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for NodePubkey {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = hex_of_len(s, 66)
            .ok_or_else(|| ConversionError::InvalidNodePubkey(format!("'{s}' is not 33 bytes of hex")))?;
        if key.starts_with("02") || key.starts_with("03") {
            Ok(Self(key))
        } else {
            Err(ConversionError::InvalidNodePubkey(format!("'{s}' is not a compressed public key")))
        }
    }
}

impl TryFrom<String> for NodePubkey {
    type Error = ConversionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodePubkey> for String {
    fn from(value: NodePubkey) -> Self {
        value.0
    }
}

impl Display for NodePubkey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------    WalletInvoice    ---------------------------------------------------------
/// A Lightning invoice owned by a wallet.
///
/// `paid` starts out false and is flipped to true exactly once, by the settlement flow, while holding the payment
/// lock for `payment_hash`.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct WalletInvoice {
    pub payment_hash: PaymentHash,
    pub wallet_id: WalletId,
    pub pubkey: NodePubkey,
    pub paid: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWalletInvoice {
    pub payment_hash: PaymentHash,
    pub wallet_id: WalletId,
    pub pubkey: NodePubkey,
}

impl NewWalletInvoice {
    pub fn new(payment_hash: PaymentHash, wallet_id: WalletId, pubkey: NodePubkey) -> Self {
        Self { payment_hash, wallet_id, pubkey }
    }
}

//--------------------------------------  NodeInvoiceSnapshot -------------------------------------------------------
/// What the issuing node currently knows about an invoice. Consumed once per lookup and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInvoiceSnapshot {
    pub is_settled: bool,
    pub received: Sats,
    pub description: String,
}

//--------------------------------------   LedgerAccountId   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct LedgerAccountId(String);

impl LedgerAccountId {
    /// The liabilities account that holds the funds owed to the owner of `wallet_id`.
    pub fn liabilities_for(wallet_id: &WalletId) -> Self {
        Self(format!("Liabilities:{wallet_id}"))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for LedgerAccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//--------------------------------------   LnPaymentReceipt  ---------------------------------------------------------
/// A request to credit a wallet's liabilities account for a settled Lightning invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LnPaymentReceipt {
    pub account: LedgerAccountId,
    pub payment_hash: PaymentHash,
    pub description: String,
    pub amount: Sats,
    pub fee: Sats,
    pub fiat_amount: Decimal,
    pub fiat_fee: Decimal,
}

/// A receipt, as recorded by the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub receipt: LnPaymentReceipt,
    pub created_at: DateTime<Utc>,
}
