//! Lightning Payment Engine
//!
//! The Lightning Payment Engine reconciles the Lightning invoices issued to wallets with the nodes that issued them,
//! and credits each settled invoice to the wallet's ledger exactly once. It is provider-agnostic.
//!
//! The library is divided into the following sections:
//! 1. The collaborator contracts ([`mod@traits`]). The engine never talks to a node, database, lock service or ledger
//!    directly. Backends implement the traits in this module in order to plug into the engine.
//! 2. The settlement API ([`SettlementApi`]). This is the state machine that decides, for each pending invoice, whether
//!    it is stale, still pending, or settled, and that guarantees at-most-once crediting under concurrent triggers.
//! 3. Backends. [`SqliteDatabase`] stores invoices, ledger entries and exchange rates, and [`MemoryPaymentLock`] is
//!    an in-process keyed lock.
//!
//! The engine also emits a `PaymentReceivedEvent` whenever an invoice is credited. A simple hook system
//! ([`mod@events`]) lets you subscribe to these events and perform custom actions.
pub mod db_types;
pub mod events;
pub mod helpers;
pub mod settlement_api;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use events::{EventHandlers, EventHooks, EventProducers};
pub use helpers::{DepositFeePolicy, MemoryPaymentLock};
pub use settlement_api::{
    errors::SettlementError,
    exchange_objects::ExchangeRate,
    exchange_rate_api::ExchangeRateApi,
    settlement_flow_api::SettlementApi,
    settlement_objects::ScanSummary,
};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
