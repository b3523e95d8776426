//! # Lightning payment server
//! This crate hosts the HTTP server that sits in front of the Lightning payment engine. It is responsible for:
//! * Receiving settlement signals for individual invoices, and refresh requests for whole wallets.
//! * Periodically reconciling every wallet's pending invoices against the LND node that issued them.
//! * Maintaining the fiat exchange rate used to value settlements.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /invoice/{payment_hash}/settle`: Reconcile one invoice now.
//! * `POST /wallet/{wallet_id}/refresh`: Reconcile all pending invoices of a wallet.
//! * `GET /exchange_rate/{currency}`: The most recent exchange rate for a currency.
//! * `POST /exchange_rate`: Set a new exchange rate.
//!
//! The `POST` routes require the `lpg_signal_token` header when a signal token is configured.

pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod scan_worker;
pub mod server;
pub mod settlement;

#[cfg(test)]
mod endpoint_tests;
