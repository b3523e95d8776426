use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::Utc;
use futures_util::{
    stream::{self, BoxStream},
    StreamExt,
};

use crate::{
    db_types::{NewWalletInvoice, PaymentHash, WalletId, WalletInvoice},
    traits::{InvoiceStore, InvoiceStoreError},
};

#[derive(Default)]
struct StoreState {
    invoices: BTreeMap<PaymentHash, WalletInvoice>,
    updates: usize,
    deletes: usize,
    fetches: usize,
    fail_updates: bool,
    fail_deletes: bool,
    fail_enumeration: bool,
    fail_fetches_after: Option<usize>,
    vanish_after_fetches: Option<usize>,
}

/// An [`InvoiceStore`] that keeps its records in memory. Pending means unpaid.
///
/// Every update yields to the scheduler before it is applied, so that concurrent settlement attempts interleave.
#[derive(Clone, Default)]
pub struct MemoryInvoiceStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("memory store lock poisoned")
    }

    /// Stores `invoice` as-is, overwriting any existing record.
    pub fn put(&self, invoice: WalletInvoice) {
        self.state().invoices.insert(invoice.payment_hash.clone(), invoice);
    }

    pub fn get(&self, payment_hash: &PaymentHash) -> Option<WalletInvoice> {
        self.state().invoices.get(payment_hash).cloned()
    }

    pub fn len(&self) -> usize {
        self.state().invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The number of successful calls to `update_invoice`.
    pub fn updates(&self) -> usize {
        self.state().updates
    }

    /// The number of successful calls to `delete_invoice_by_payment_hash`.
    pub fn deletes(&self) -> usize {
        self.state().deletes
    }

    pub fn fail_updates(&self, fail: bool) {
        self.state().fail_updates = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state().fail_deletes = fail;
    }

    pub fn fail_enumeration(&self, fail: bool) {
        self.state().fail_enumeration = fail;
    }

    /// Every call to `fetch_invoice_by_payment_hash` after the first `n` fails.
    pub fn fail_fetches_after(&self, n: usize) {
        self.state().fail_fetches_after = Some(n);
    }

    /// Once `fetch_invoice_by_payment_hash` has answered `n` times, the fetched record is removed, as if another
    /// process deleted it right after it was read.
    pub fn vanish_after_fetches(&self, n: usize) {
        self.state().vanish_after_fetches = Some(n);
    }
}

impl InvoiceStore for MemoryInvoiceStore {
    async fn insert_invoice(&self, invoice: NewWalletInvoice) -> Result<WalletInvoice, InvoiceStoreError> {
        let mut state = self.state();
        if state.invoices.contains_key(&invoice.payment_hash) {
            return Err(InvoiceStoreError::InvoiceAlreadyExists(invoice.payment_hash));
        }
        let now = Utc::now();
        let record = WalletInvoice {
            payment_hash: invoice.payment_hash,
            wallet_id: invoice.wallet_id,
            pubkey: invoice.pubkey,
            paid: false,
            created_at: now,
            updated_at: now,
        };
        state.invoices.insert(record.payment_hash.clone(), record.clone());
        Ok(record)
    }

    async fn fetch_invoice_by_payment_hash(
        &self,
        payment_hash: &PaymentHash,
    ) -> Result<Option<WalletInvoice>, InvoiceStoreError> {
        let mut state = self.state();
        if state.fail_fetches_after.is_some_and(|n| state.fetches >= n) {
            return Err(InvoiceStoreError::DatabaseError("fetch failed".to_string()));
        }
        state.fetches += 1;
        let invoice = state.invoices.get(payment_hash).cloned();
        if state.vanish_after_fetches.is_some_and(|n| state.fetches >= n) {
            state.invoices.remove(payment_hash);
        }
        Ok(invoice)
    }

    fn fetch_pending_invoices_for_wallet<'a>(
        &'a self,
        wallet_id: &'a WalletId,
    ) -> BoxStream<'a, Result<WalletInvoice, InvoiceStoreError>> {
        let state = self.state();
        if state.fail_enumeration {
            let err = InvoiceStoreError::DatabaseError("enumeration failed".to_string());
            return stream::iter(vec![Err(err)]).boxed();
        }
        let mut pending = state
            .invoices
            .values()
            .filter(|i| &i.wallet_id == wallet_id && !i.paid)
            .cloned()
            .collect::<Vec<_>>();
        pending.sort_by_key(|i| i.created_at);
        stream::iter(pending.into_iter().map(Ok)).boxed()
    }

    async fn update_invoice(&self, invoice: &WalletInvoice) -> Result<WalletInvoice, InvoiceStoreError> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        if state.fail_updates {
            return Err(InvoiceStoreError::DatabaseError("update failed".to_string()));
        }
        let record = state
            .invoices
            .get_mut(&invoice.payment_hash)
            .ok_or_else(|| InvoiceStoreError::InvoiceNotFound(invoice.payment_hash.clone()))?;
        record.paid = invoice.paid;
        record.updated_at = Utc::now();
        let record = record.clone();
        state.updates += 1;
        Ok(record)
    }

    async fn delete_invoice_by_payment_hash(&self, payment_hash: &PaymentHash) -> Result<(), InvoiceStoreError> {
        let mut state = self.state();
        if state.fail_deletes {
            return Err(InvoiceStoreError::DatabaseError("delete failed".to_string()));
        }
        state.invoices.remove(payment_hash);
        state.deletes += 1;
        Ok(())
    }

    async fn fetch_wallets_with_pending_invoices(&self) -> Result<Vec<WalletId>, InvoiceStoreError> {
        let mut wallets =
            self.state().invoices.values().filter(|i| !i.paid).map(|i| i.wallet_id.clone()).collect::<Vec<_>>();
        wallets.sort();
        wallets.dedup();
        Ok(wallets)
    }
}
