use std::{env, time::Duration};

use ln_payment_engine::helpers::DepositFeePolicy;
use lnd_tools::LndConfig;
use log::*;
use lpg_common::{helpers::env_parse_or, Secret};

const DEFAULT_LPG_HOST: &str = "127.0.0.1";
const DEFAULT_LPG_PORT: u16 = 8360;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/ln_payments.db";
const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;
const DEFAULT_SCAN_CONCURRENCY: usize = 4;
const DEFAULT_FIAT_CURRENCY: &str = "USD";
const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// If set, settlement signals must carry this token in the `lpg_signal_token` header.
    pub signal_token: Option<Secret<String>>,
    /// How often the background worker reconciles every wallet's pending invoices. Zero disables the worker.
    pub scan_interval: Duration,
    /// The number of wallets that the background worker reconciles in parallel.
    pub scan_concurrency: usize,
    /// Received amounts are converted into this currency when crediting the ledger.
    pub fiat_currency: String,
    /// Exchange rates older than this are refused. `None` accepts a rate of any age.
    pub max_rate_age: Option<chrono::Duration>,
    pub fee_policy: DepositFeePolicy,
    pub lock_timeout: Duration,
    pub lnd: LndConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPG_HOST.to_string(),
            port: DEFAULT_LPG_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            signal_token: None,
            scan_interval: Duration::from_secs(DEFAULT_SCAN_INTERVAL_SECS),
            scan_concurrency: DEFAULT_SCAN_CONCURRENCY,
            fiat_currency: DEFAULT_FIAT_CURRENCY.to_string(),
            max_rate_age: None,
            fee_policy: DepositFeePolicy::default(),
            lock_timeout: Duration::from_secs(DEFAULT_LOCK_TIMEOUT_SECS),
            lnd: LndConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LPG_HOST").ok().unwrap_or_else(|| DEFAULT_LPG_HOST.into());
        let port = env_parse_or("LPG_PORT", DEFAULT_LPG_PORT);
        let database_url = env::var("LPG_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ LPG_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let signal_token = env::var("LPG_SIGNAL_TOKEN").ok().filter(|s| !s.trim().is_empty()).map(Secret::new);
        if signal_token.is_none() {
            warn!("🪛️ LPG_SIGNAL_TOKEN is not set. Anyone who can reach the server can trigger settlement signals.");
        }
        let scan_interval = Duration::from_secs(env_parse_or("LPG_SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS));
        let scan_concurrency = env_parse_or("LPG_SCAN_CONCURRENCY", DEFAULT_SCAN_CONCURRENCY).max(1);
        let fiat_currency = env::var("LPG_FIAT_CURRENCY")
            .ok()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_FIAT_CURRENCY.into());
        let max_rate_age = match env_parse_or("LPG_MAX_RATE_AGE_SECS", 0i64) {
            secs if secs > 0 => Some(chrono::Duration::seconds(secs)),
            _ => None,
        };
        let fee_policy = DepositFeePolicy::new(env_parse_or("LPG_LN_FEE_BPS", 0u32));
        let lock_timeout = Duration::from_secs(env_parse_or("LPG_LOCK_TIMEOUT_SECS", DEFAULT_LOCK_TIMEOUT_SECS));
        let lnd = LndConfig::new_from_env_or_default();
        Self {
            host,
            port,
            database_url,
            signal_token,
            scan_interval,
            scan_concurrency,
            fiat_currency,
            max_rate_age,
            fee_policy,
            lock_timeout,
            lnd,
        }
    }
}
