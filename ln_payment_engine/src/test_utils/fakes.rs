use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
};

use lpg_common::Sats;

use crate::{
    db_types::{LnPaymentReceipt, NodeInvoiceSnapshot, NodePubkey, PaymentHash},
    settlement_api::exchange_objects::ExchangeRate,
    traits::{ExchangeRateError, InvoiceLookup, InvoiceLookupError, LedgerError, LedgerPoster, PriceOracle},
};

#[derive(Default)]
struct NodeState {
    invoices: HashMap<PaymentHash, NodeInvoiceSnapshot>,
    failing: HashSet<PaymentHash>,
    offline: HashSet<NodePubkey>,
    lookups: usize,
}

/// A Lightning node that answers invoice lookups from an in-memory table. Unknown invoices are not found.
///
/// Every lookup yields to the scheduler before answering, so that concurrent settlement attempts interleave.
#[derive(Clone, Default)]
pub struct FakeNode {
    state: Arc<Mutex<NodeState>>,
}

impl FakeNode {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, NodeState> {
        self.state.lock().expect("fake node lock poisoned")
    }

    pub fn add_pending(&self, payment_hash: &PaymentHash, description: &str) {
        let snapshot = NodeInvoiceSnapshot { is_settled: false, received: Sats::from(0), description: description.into() };
        self.state().invoices.insert(payment_hash.clone(), snapshot);
    }

    pub fn settle(&self, payment_hash: &PaymentHash, received: Sats, description: &str) {
        let snapshot = NodeInvoiceSnapshot { is_settled: true, received, description: description.into() };
        self.state().invoices.insert(payment_hash.clone(), snapshot);
    }

    /// Lookups for `payment_hash` will fail with a node error.
    pub fn fail_lookups_for(&self, payment_hash: &PaymentHash) {
        self.state().failing.insert(payment_hash.clone());
    }

    pub fn take_offline(&self, pubkey: &NodePubkey) {
        self.state().offline.insert(pubkey.clone());
    }

    pub fn lookups(&self) -> usize {
        self.state().lookups
    }
}

impl InvoiceLookup for FakeNode {
    async fn lookup_invoice(
        &self,
        pubkey: &NodePubkey,
        payment_hash: &PaymentHash,
    ) -> Result<Option<NodeInvoiceSnapshot>, InvoiceLookupError> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        state.lookups += 1;
        if state.offline.contains(pubkey) {
            return Err(InvoiceLookupError::NodeUnavailable(pubkey.clone()));
        }
        if state.failing.contains(payment_hash) {
            return Err(InvoiceLookupError::NodeError(format!("lookup of {payment_hash} failed")));
        }
        Ok(state.invoices.get(payment_hash).cloned())
    }
}

/// A ledger that records every receipt and rejects a second receipt for the same payment hash.
#[derive(Clone, Default)]
pub struct MemoryLedger {
    receipts: Arc<Mutex<Vec<LnPaymentReceipt>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn receipts(&self) -> Vec<LnPaymentReceipt> {
        self.receipts.lock().expect("memory ledger lock poisoned").clone()
    }
}

impl LedgerPoster for MemoryLedger {
    async fn receive_ln_payment(&self, receipt: LnPaymentReceipt) -> Result<(), LedgerError> {
        let mut receipts = self.receipts.lock().expect("memory ledger lock poisoned");
        if receipts.iter().any(|r| r.payment_hash == receipt.payment_hash) {
            return Err(LedgerError::DuplicateEntry(receipt.payment_hash));
        }
        receipts.push(receipt);
        Ok(())
    }
}

/// Always quotes the same rate.
#[derive(Clone, Debug)]
pub struct FixedPriceOracle(pub ExchangeRate);

impl PriceOracle for FixedPriceOracle {
    async fn current_rate(&self) -> Result<ExchangeRate, ExchangeRateError> {
        Ok(self.0.clone())
    }
}
