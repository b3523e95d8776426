use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use ln_payment_engine::{traits::ExchangeRateError, ExchangeRate, ExchangeRateApi};
use lpg_common::Secret;
use rust_decimal_macros::dec;
use serde_json::json;

use super::helpers::{get_request, post_request, TEST_TOKEN};
use crate::{
    auth::SignalToken,
    data_objects::ExchangeRateResult,
    endpoint_tests::mocks::MockRateStore,
    routes::{GetExchangeRateRoute, SetExchangeRateRoute},
};

fn configure_with(store: MockRateStore) -> impl FnOnce(&mut ServiceConfig) {
    let api = ExchangeRateApi::new(store, "usd");
    let token = SignalToken::new(Some(Secret::new(TEST_TOKEN.to_string())));
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(api))
            .app_data(web::Data::new(token))
            .service(GetExchangeRateRoute::<MockRateStore>::new())
            .service(SetExchangeRateRoute::<MockRateStore>::new());
    }
}

#[actix_web::test]
async fn fetch_exchange_rate() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    let updated_at = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
    store
        .expect_fetch_last_rate()
        .withf(|c| c.to_string() == "EUR")
        .times(1)
        .returning(move |_| Ok(ExchangeRate::new("EUR".into(), dec!(0.00055), Some(updated_at))));
    let (status, body) = get_request("/exchange_rate/eur", configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    let result: ExchangeRateResult = serde_json::from_str(&body).unwrap();
    assert_eq!(result.currency, "EUR");
    assert_eq!(result.rate, dec!(0.00055));
    assert_eq!(result.updated_at, updated_at);
}

#[actix_web::test]
async fn missing_exchange_rate() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    store.expect_fetch_last_rate().returning(|c| Err(ExchangeRateError::RateDoesNotExist(c.to_string())));
    let (status, _) = get_request("/exchange_rate/xau", configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn set_exchange_rate() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    store
        .expect_set_exchange_rate()
        .withf(|r| r.currency == "USD" && r.rate == dec!(0.0006))
        .times(1)
        .returning(|_| Ok(()));
    let body = json!({ "currency": "usd", "rate": "0.0006" });
    let (status, body) =
        post_request(TEST_TOKEN, "/exchange_rate", Some(body), configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"success\":true"), "{body}");
}

#[actix_web::test]
async fn set_exchange_rate_requires_token() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    store.expect_set_exchange_rate().never();
    let body = json!({ "currency": "usd", "rate": "0.0006" });
    let (status, _) = post_request("", "/exchange_rate", Some(body), configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn negative_rates_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    store.expect_set_exchange_rate().never();
    let body = json!({ "currency": "usd", "rate": "-1" });
    let (status, _) = post_request(TEST_TOKEN, "/exchange_rate", Some(body), configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn rates_that_cannot_value_every_amount_are_rejected() {
    let _ = env_logger::try_init().ok();
    let mut store = MockRateStore::new();
    store.expect_set_exchange_rate().never();
    let body = json!({ "currency": "usd", "rate": "1000000000000000000000" });
    let (status, body) =
        post_request(TEST_TOKEN, "/exchange_rate", Some(body), configure_with(store)).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("cannot be expressed"), "{body}");
}
