use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use ln_payment_engine::{
    helpers::MemoryPaymentLock,
    EventHandlers,
    ExchangeRateApi,
    SettlementApi,
    SqliteDatabase,
};
use log::*;

use crate::{
    auth::SignalToken,
    config::ServerConfig,
    errors::ServerError,
    integrations::{create_event_hooks, lnd::LndInvoiceLookup},
    routes::{health, GetExchangeRateRoute, RefreshWalletRoute, SetExchangeRateRoute, SettleInvoiceRoute},
    scan_worker::start_scan_worker,
    settlement::LnSettlementApi,
};

const EVENT_BUFFER_SIZE: usize = 25;
const MAX_DB_CONNECTIONS: u32 = 25;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, MAX_DB_CONNECTIONS)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🗃️ Connected to {}", db.url());
    let node = LndInvoiceLookup::from_config(config.lnd.clone())?;
    let handlers = EventHandlers::new(EVENT_BUFFER_SIZE, create_event_hooks());
    let producers = handlers.producers();
    handlers.start_handlers().await;

    let mut rates = ExchangeRateApi::new(db.clone(), &config.fiat_currency);
    if let Some(max_age) = config.max_rate_age {
        rates = rates.with_max_age(max_age);
    }
    let lock = MemoryPaymentLock::with_timeout(config.lock_timeout);
    let api: LnSettlementApi = SettlementApi::new(db.clone(), node, lock, db.clone(), rates.clone(), producers)
        .with_fee_policy(config.fee_policy);
    let api = web::Data::new(api);
    let _worker = start_scan_worker(api.clone(), config.scan_interval, config.scan_concurrency);

    let srv = create_server_instance(config, api, web::Data::new(rates))?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    api: web::Data<LnSettlementApi>,
    rates: web::Data<ExchangeRateApi<SqliteDatabase>>,
) -> Result<Server, ServerError> {
    let token = web::Data::new(SignalToken::new(config.signal_token.clone()));
    let srv = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lpg::access_log"))
            .app_data(api.clone())
            .app_data(rates.clone())
            .app_data(token.clone())
            .service(health)
            .service(SettleInvoiceRoute::<LnSettlementApi>::new())
            .service(RefreshWalletRoute::<LnSettlementApi>::new())
            .service(GetExchangeRateRoute::<SqliteDatabase>::new())
            .service(SetExchangeRateRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    info!("🚀️ Listening on {}:{}", config.host, config.port);
    Ok(srv)
}
