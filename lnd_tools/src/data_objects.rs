use serde::{Deserialize, Serialize};

use crate::helpers::i64_from_string;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceState {
    #[default]
    Open,
    Settled,
    Canceled,
    Accepted,
    #[serde(other)]
    Unknown,
}

/// The subset of LND's `lnrpc.Invoice` that is needed to reconcile an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LndInvoice {
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub state: InvoiceState,
    /// Deprecated by LND in favour of `state`, but still reported.
    #[serde(default)]
    pub settled: bool,
    #[serde(default, deserialize_with = "i64_from_string")]
    pub value: i64,
    #[serde(default, deserialize_with = "i64_from_string")]
    pub amt_paid_sat: i64,
    #[serde(default, deserialize_with = "i64_from_string")]
    pub settle_date: i64,
}

impl LndInvoice {
    pub fn is_settled(&self) -> bool {
        self.state == InvoiceState::Settled || self.settled
    }
}
