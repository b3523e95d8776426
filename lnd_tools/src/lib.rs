//! A minimal client for the LND REST API. Only the calls needed to reconcile invoices are implemented.
mod api;
mod config;
mod error;
mod helpers;

mod data_objects;

pub use api::LndApi;
pub use config::LndConfig;
pub use data_objects::{InvoiceState, LndInvoice};
pub use error::LndApiError;
pub use helpers::is_payment_hash_hex;
