//! # Settlement API
//!
//! * [`settlement_flow_api`] reconciles pending wallet invoices with their issuing nodes and credits settled ones.
//! * [`exchange_rate_api`] manages the exchange rate used to value settlements, and acts as the price oracle.
//!
//! Like the rest of the engine, an API instance is created by supplying backends that implement the traits in
//! [`crate::traits`]:
//!
//! ```rust,ignore
//! use ln_payment_engine::{EventProducers, ExchangeRateApi, MemoryPaymentLock, SettlementApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url(url, 5).await?;
//! let oracle = ExchangeRateApi::new(db.clone(), "USD");
//! let api = SettlementApi::new(db.clone(), lnd, MemoryPaymentLock::new(), db, oracle, EventProducers::default());
//! let settled = api.update_pending_invoice_by_payment_hash(&payment_hash, None).await?;
//! ```
pub mod errors;
pub mod exchange_objects;
pub mod exchange_rate_api;
pub mod settlement_flow_api;
pub mod settlement_objects;
