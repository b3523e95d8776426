use std::fmt::Debug;

use futures_util::{stream, StreamExt};
use log::*;

use crate::{
    db_types::{LedgerAccountId, LnPaymentReceipt, NodeInvoiceSnapshot, PaymentHash, WalletId, WalletInvoice},
    events::PaymentReceivedEvent,
    helpers::{DepositFeeCalculator, DepositFeePolicy},
    settlement_api::{errors::SettlementError, settlement_objects::ScanSummary},
    traits::{
        InvoiceLookup,
        InvoiceStore,
        LedgerPoster,
        LockError,
        Notifier,
        PaymentLock,
        PaymentLockGuard,
        PriceOracle,
    },
};

/// `SettlementApi` reconciles wallet invoices against the node that issued them, and credits each settled invoice
/// exactly once.
///
/// Every collaborator is injected:
/// * `S` is the invoice store,
/// * `N` resolves invoice status on the issuing node,
/// * `K` is the per-payment-hash lock,
/// * `G` is the ledger,
/// * `P` quotes the exchange rate,
/// * `E` delivers notifications.
pub struct SettlementApi<S, N, K, G, P, E> {
    store: S,
    node: N,
    lock: K,
    ledger: G,
    oracle: P,
    notifier: E,
    fees: DepositFeePolicy,
}

impl<S, N, K, G, P, E> Debug for SettlementApi<S, N, K, G, P, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SettlementApi({:?})", self.fees)
    }
}

impl<S, N, K, G, P, E> SettlementApi<S, N, K, G, P, E> {
    pub fn new(store: S, node: N, lock: K, ledger: G, oracle: P, notifier: E) -> Self {
        Self { store, node, lock, ledger, oracle, notifier, fees: DepositFeePolicy::default() }
    }

    pub fn with_fee_policy(mut self, fees: DepositFeePolicy) -> Self {
        self.fees = fees;
        self
    }
}

impl<S, N, K, G, P, E> SettlementApi<S, N, K, G, P, E>
where
    S: InvoiceStore,
    N: InvoiceLookup,
    K: PaymentLock,
    G: LedgerPoster,
    P: PriceOracle,
    E: Notifier,
{
    /// Reconciles every pending invoice of `wallet_id`, one at a time.
    ///
    /// A failure to settle one invoice is logged and counted, and the scan moves on to the next one. The scan only
    /// fails if the store cannot enumerate the pending invoices.
    ///
    /// If the caller already holds the lock for one of the invoices, it can pass the guard in as `held`. It is used
    /// for the invoice it covers, and the locks for every other invoice are acquired as usual.
    pub async fn update_pending_invoices(
        &self,
        wallet_id: &WalletId,
        held: Option<&K::Guard>,
    ) -> Result<ScanSummary, SettlementError> {
        trace!("🔄️⚡️ Scanning pending invoices for wallet {wallet_id}");
        let mut summary = ScanSummary::default();
        let mut pending = self.store.fetch_pending_invoices_for_wallet(wallet_id);
        while let Some(invoice) = pending.next().await {
            let invoice = invoice?;
            let payment_hash = invoice.payment_hash.clone();
            let guard = held.filter(|g| g.payment_hash() == &payment_hash);
            match self.update_pending_invoice(invoice, guard).await {
                Ok(true) => summary.settled += 1,
                Ok(false) => summary.unsettled += 1,
                Err(e) => {
                    warn!("🔄️⚡️ Could not settle invoice {payment_hash} for wallet {wallet_id}. {e}");
                    summary.failed += 1;
                },
            }
        }
        debug!("🔄️⚡️ Scan of wallet {wallet_id} complete. {summary}");
        Ok(summary)
    }

    /// Reconciles a single invoice, identified by its payment hash.
    ///
    /// Returns `true` if the invoice is settled and credited (now or previously), and `false` if there was nothing to
    /// settle: the invoice is unknown, still pending at the node, or was removed because the node no longer knows it.
    /// Errors are safe to retry.
    pub async fn update_pending_invoice_by_payment_hash(
        &self,
        payment_hash: &PaymentHash,
        held: Option<&K::Guard>,
    ) -> Result<bool, SettlementError> {
        match self.store.fetch_invoice_by_payment_hash(payment_hash).await? {
            Some(invoice) => self.update_pending_invoice(invoice, held).await,
            None => {
                info!("🔄️⚡️ No invoice with payment hash {payment_hash} exists. Nothing to settle.");
                Ok(false)
            },
        }
    }

    /// Runs [`Self::update_pending_invoices`] for every wallet that has pending invoices, scanning up to
    /// `concurrency` wallets at a time.
    ///
    /// A wallet whose scan fails is logged and skipped.
    pub async fn update_all_pending_invoices(&self, concurrency: usize) -> Result<ScanSummary, SettlementError> {
        let wallets = self.store.fetch_wallets_with_pending_invoices().await?;
        debug!("🔄️⚡️ {} wallets have pending invoices", wallets.len());
        let results = stream::iter(wallets)
            .map(|wallet_id| async move {
                let result = self.update_pending_invoices(&wallet_id, None).await;
                (wallet_id, result)
            })
            .buffer_unordered(concurrency.max(1))
            .collect::<Vec<_>>()
            .await;
        let mut total = ScanSummary::default();
        for (wallet_id, result) in results {
            match result {
                Ok(summary) => total += summary,
                Err(e) => error!("🔄️⚡️ Could not scan the pending invoices of wallet {wallet_id}. {e}"),
            }
        }
        Ok(total)
    }

    async fn update_pending_invoice(
        &self,
        invoice: WalletInvoice,
        held: Option<&K::Guard>,
    ) -> Result<bool, SettlementError> {
        let payment_hash = &invoice.payment_hash;
        let snapshot = match self.node.lookup_invoice(&invoice.pubkey, payment_hash).await? {
            Some(snapshot) => snapshot,
            None => {
                info!("🔄️⚡️ Node {} no longer knows invoice {payment_hash}. Removing the stale record.", invoice.pubkey);
                self.store.delete_invoice_by_payment_hash(payment_hash).await.map_err(|e| {
                    error!("🔄️⚡️ Could not remove stale invoice {payment_hash}. {e}");
                    e
                })?;
                return Ok(false);
            },
        };
        if !snapshot.is_settled {
            trace!("🔄️⚡️ Invoice {payment_hash} is not settled yet");
            return Ok(false);
        }
        if invoice.paid {
            debug!("🔄️⚡️ Invoice {payment_hash} has already been credited");
            return Ok(true);
        }
        match held {
            Some(guard) if guard.payment_hash() != payment_hash => Err(LockError::GuardMismatch {
                held: guard.payment_hash().clone(),
                requested: payment_hash.clone(),
            }
            .into()),
            Some(_) => self.credit_settled_invoice(payment_hash, snapshot).await,
            None => {
                let _guard = self.lock.acquire(payment_hash).await?;
                self.credit_settled_invoice(payment_hash, snapshot).await
            },
        }
    }

    /// The exclusive region. Callers must hold the lock for `payment_hash`.
    async fn credit_settled_invoice(
        &self,
        payment_hash: &PaymentHash,
        snapshot: NodeInvoiceSnapshot,
    ) -> Result<bool, SettlementError> {
        let mut invoice = match self.store.fetch_invoice_by_payment_hash(payment_hash).await? {
            Some(invoice) => invoice,
            None => {
                warn!("🔄️⚡️ Invoice {payment_hash} disappeared while waiting for its lock");
                return Ok(false);
            },
        };
        if invoice.paid {
            info!("🔄️⚡️ Invoice {payment_hash} was credited by a concurrent settlement");
            return Ok(true);
        }
        invoice.paid = true;
        let invoice = self.store.update_invoice(&invoice).await?;

        let rate = self.oracle.current_rate().await?;
        let amount = snapshot.received;
        let fee = DepositFeeCalculator::new(amount).ln_deposit_fee(&self.fees);
        let fiat_amount = rate.convert(amount)?;
        let fiat_fee = rate.convert(fee)?;
        let receipt = LnPaymentReceipt {
            account: LedgerAccountId::liabilities_for(&invoice.wallet_id),
            payment_hash: payment_hash.clone(),
            description: snapshot.description,
            amount,
            fee,
            fiat_amount,
            fiat_fee,
        };
        debug!(
            "🔄️⚡️ Crediting {} with {amount} (fee {fee}) at {rate} for invoice {payment_hash}",
            receipt.account
        );
        self.ledger.receive_ln_payment(receipt).await?;
        info!("🔄️⚡️ Invoice {payment_hash} settled. {amount} credited to wallet {}", invoice.wallet_id);

        let event = PaymentReceivedEvent::new(amount, invoice.wallet_id.clone(), payment_hash.clone());
        if let Err(e) = self.notifier.ln_payment_received(event).await {
            warn!("🔄️⚡️ Payment received notification for {payment_hash} was not delivered. {e}");
        }
        Ok(true)
    }
}
