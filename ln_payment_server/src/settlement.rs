//! The route handlers and the scan worker only need three things from the settlement engine, so they depend on the
//! [`SettlementHandle`] trait rather than on the fully parameterised [`SettlementApi`]. This keeps the handlers
//! testable with a mock.
use ln_payment_engine::{
    db_types::{PaymentHash, WalletId},
    events::EventProducers,
    helpers::MemoryPaymentLock,
    traits::{InvoiceLookup, InvoiceStore, LedgerPoster, Notifier, PaymentLock, PriceOracle},
    ExchangeRateApi,
    ScanSummary,
    SettlementApi,
    SettlementError,
    SqliteDatabase,
};

use crate::integrations::lnd::LndInvoiceLookup;

/// The settlement engine, as wired up by the server.
pub type LnSettlementApi = SettlementApi<
    SqliteDatabase,
    LndInvoiceLookup,
    MemoryPaymentLock,
    SqliteDatabase,
    ExchangeRateApi<SqliteDatabase>,
    EventProducers,
>;

#[allow(async_fn_in_trait)]
pub trait SettlementHandle {
    /// Reconcile the single invoice identified by `payment_hash`. Returns whether the invoice is (now) paid.
    async fn settle(&self, payment_hash: &PaymentHash) -> Result<bool, SettlementError>;
    /// Reconcile all pending invoices of one wallet.
    async fn refresh_wallet(&self, wallet_id: &WalletId) -> Result<ScanSummary, SettlementError>;
    /// Reconcile all pending invoices of every wallet.
    async fn scan_all(&self, concurrency: usize) -> Result<ScanSummary, SettlementError>;
}

impl<S, N, K, G, P, E> SettlementHandle for SettlementApi<S, N, K, G, P, E>
where
    S: InvoiceStore,
    N: InvoiceLookup,
    K: PaymentLock,
    G: LedgerPoster,
    P: PriceOracle,
    E: Notifier,
{
    async fn settle(&self, payment_hash: &PaymentHash) -> Result<bool, SettlementError> {
        self.update_pending_invoice_by_payment_hash(payment_hash, None).await
    }

    async fn refresh_wallet(&self, wallet_id: &WalletId) -> Result<ScanSummary, SettlementError> {
        self.update_pending_invoices(wallet_id, None).await
    }

    async fn scan_all(&self, concurrency: usize) -> Result<ScanSummary, SettlementError> {
        self.update_all_pending_invoices(concurrency).await
    }
}
