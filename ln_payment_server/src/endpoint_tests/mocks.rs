use ln_payment_engine::{
    db_types::{PaymentHash, WalletId},
    traits::{ExchangeRateError, ExchangeRates},
    ExchangeRate,
    ScanSummary,
    SettlementError,
};
use mockall::mock;

use crate::settlement::SettlementHandle;

mock! {
    pub Settlement {}
    impl SettlementHandle for Settlement {
        async fn settle(&self, payment_hash: &PaymentHash) -> Result<bool, SettlementError>;
        async fn refresh_wallet(&self, wallet_id: &WalletId) -> Result<ScanSummary, SettlementError>;
        async fn scan_all(&self, concurrency: usize) -> Result<ScanSummary, SettlementError>;
    }
}

mock! {
    pub RateStore {}
    impl ExchangeRates for RateStore {
        async fn fetch_last_rate(&self, currency: &str) -> Result<ExchangeRate, ExchangeRateError>;
        async fn set_exchange_rate(&self, rate: &ExchangeRate) -> Result<(), ExchangeRateError>;
    }
}
