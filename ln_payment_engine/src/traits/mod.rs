//! # Collaborator contracts
//!
//! The settlement flow never talks to a node, a database, a lock service or a ledger directly. Instead, each
//! collaborator is described by a trait in this module, and concrete implementations are injected into
//! [`crate::SettlementApi`].
//!
//! * [`InvoiceLookup`] resolves the node-side status of an invoice.
//! * [`PaymentLock`] provides mutual exclusion per payment hash.
//! * [`InvoiceStore`] persists wallet invoice records.
//! * [`LedgerPoster`] credits a wallet's liabilities account.
//! * [`PriceOracle`] supplies the current exchange rate, and [`ExchangeRates`] is the storage behind it.
//! * [`Notifier`] delivers best-effort "payment received" notifications.
//!
//! Every fallible method returns a `Result`. Where "not found" is a legitimate outcome, it is expressed as `Ok(None)`
//! rather than as an error, so that callers can tell "nothing to do" apart from "retry me".
mod exchange_rates;
mod invoice_lookup;
mod invoice_store;
mod ledger;
mod notifier;
mod payment_lock;

pub use exchange_rates::{ExchangeRateError, ExchangeRates, PriceOracle};
pub use invoice_lookup::{InvoiceLookup, InvoiceLookupError};
pub use invoice_store::{InvoiceStore, InvoiceStoreError};
pub use ledger::{LedgerError, LedgerPoster};
pub use notifier::{NotificationError, Notifier};
pub use payment_lock::{LockError, PaymentLock, PaymentLockGuard};
