//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a line or two belong in a separate module.
//!
//! Each worker thread processes its requests sequentially, so handlers must never block the thread. Anything that
//! waits on the node, the database or the payment lock is expressed as a future.
use actix_web::{get, web, HttpResponse, Responder};
use ln_payment_engine::{
    db_types::{PaymentHash, Sats, WalletId},
    traits::ExchangeRates,
    ExchangeRate,
    ExchangeRateApi,
};
use log::*;
use lpg_common::SATS_PER_BTC;

use crate::{
    auth::SignalAuthorized,
    data_objects::{ExchangeRateResult, ExchangeRateUpdate, JsonResponse, SettleResponse},
    errors::ServerError,
    settlement::SettlementHandle,
};

const MAX_SUPPLY_SATS: i64 = 21_000_000 * SATS_PER_BTC;

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Settlement  ----------------------------------------------------
route!(settle_invoice => Post "/invoice/{payment_hash}/settle" impl SettlementHandle);
/// Signals that the invoice with the given payment hash may have been paid.
///
/// The invoice is reconciled against its issuing node right away, and credited if it has settled. Repeating the
/// signal is harmless: an invoice is only ever credited once. The response reports whether the invoice is paid.
pub async fn settle_invoice<T: SettlementHandle>(
    _auth: SignalAuthorized,
    path: web::Path<String>,
    api: web::Data<T>,
) -> Result<HttpResponse, ServerError> {
    let payment_hash = path.into_inner().parse::<PaymentHash>().map_err(|e| {
        debug!("💻️ Rejected settlement signal. {e}");
        ServerError::InvalidRequestPath(e.to_string())
    })?;
    debug!("💻️ POST settlement signal for {payment_hash}");
    let settled = api.settle(&payment_hash).await.map_err(|e| {
        warn!("💻️ Could not settle invoice {payment_hash}. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(SettleResponse { settled }))
}

route!(refresh_wallet => Post "/wallet/{wallet_id}/refresh" impl SettlementHandle);
/// Reconciles every pending invoice of a wallet and returns a summary of the outcome.
pub async fn refresh_wallet<T: SettlementHandle>(
    _auth: SignalAuthorized,
    path: web::Path<String>,
    api: web::Data<T>,
) -> Result<HttpResponse, ServerError> {
    let wallet_id =
        path.into_inner().parse::<WalletId>().map_err(|e| ServerError::InvalidRequestPath(e.to_string()))?;
    debug!("💻️ POST refresh for wallet {wallet_id}");
    let summary = api.refresh_wallet(&wallet_id).await?;
    info!("💻️ Refreshed wallet {wallet_id}. {summary}");
    Ok(HttpResponse::Ok().json(summary))
}

//----------------------------------------------   Exchange rates  ------------------------------------------------
route!(get_exchange_rate => Get "/exchange_rate/{currency}" impl ExchangeRates);
pub async fn get_exchange_rate<B: ExchangeRates>(
    path: web::Path<String>,
    api: web::Data<ExchangeRateApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let currency = path.into_inner();
    trace!("💻️ GET exchange rate for {currency}");
    let rate = api.fetch_last_rate(&currency).await?;
    Ok(HttpResponse::Ok().json(ExchangeRateResult::from(rate)))
}

route!(set_exchange_rate => Post "/exchange_rate" impl ExchangeRates);
pub async fn set_exchange_rate<B: ExchangeRates>(
    _auth: SignalAuthorized,
    body: web::Json<ExchangeRateUpdate>,
    api: web::Data<ExchangeRateApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let update = body.into_inner();
    if update.currency.trim().is_empty() || update.rate.is_sign_negative() {
        return Err(ServerError::InvalidRequestBody("The currency must be set, and the rate cannot be negative".into()));
    }
    let rate = ExchangeRate::from(update);
    // Every amount the ledger can ever see must be convertible at this rate
    rate.convert(Sats::from(MAX_SUPPLY_SATS))?;
    debug!("💻️ POST new exchange rate: {rate}");
    api.set_exchange_rate(&rate).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Exchange rate updated: {rate}"))))
}
