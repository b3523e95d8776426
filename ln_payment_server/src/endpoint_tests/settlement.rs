use actix_web::{http::StatusCode, web, web::ServiceConfig};
use ln_payment_engine::{traits::InvoiceLookupError, ScanSummary, SettlementError};
use lpg_common::Secret;

use super::helpers::{post_request, TEST_TOKEN};
use crate::{
    auth::SignalToken,
    endpoint_tests::mocks::MockSettlement,
    routes::{RefreshWalletRoute, SettleInvoiceRoute},
};

const HASH: &str = "5f2b4c0a1e9d8c7b6a5f4e3d2c1b0a99887766554433221100ffeeddccbbaa99";

fn settle_path() -> String {
    format!("/invoice/{HASH}/settle")
}

fn configure_with(mock: MockSettlement, token: Option<&str>) -> impl FnOnce(&mut ServiceConfig) {
    let token = SignalToken::new(token.map(|t| Secret::new(t.to_string())));
    move |cfg: &mut ServiceConfig| {
        cfg.app_data(web::Data::new(mock))
            .app_data(web::Data::new(token))
            .service(SettleInvoiceRoute::<MockSettlement>::new())
            .service(RefreshWalletRoute::<MockSettlement>::new());
    }
}

#[actix_web::test]
async fn settle_invoice() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle().withf(|h| h.as_str() == HASH).times(1).returning(|_| Ok(true));
    let (status, body) =
        post_request(TEST_TOKEN, &settle_path(), None, configure_with(mock, Some(TEST_TOKEN))).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"settled":true}"#);
}

#[actix_web::test]
async fn settle_unsettled_invoice() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle().times(1).returning(|_| Ok(false));
    let (status, body) = post_request("", &settle_path(), None, configure_with(mock, None)).await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"settled":false}"#);
}

#[actix_web::test]
async fn settle_requires_token() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle().never();
    let (status, body) = post_request("", &settle_path(), None, configure_with(mock, Some(TEST_TOKEN))).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body.contains("signal token"), "{body}");
}

#[actix_web::test]
async fn settle_rejects_wrong_token() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle().never();
    let (status, _) =
        post_request("guess", &settle_path(), None, configure_with(mock, Some(TEST_TOKEN))).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn settle_rejects_malformed_hash() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle().never();
    let (status, body) =
        post_request(TEST_TOKEN, "/invoice/abc123/settle", None, configure_with(mock, Some(TEST_TOKEN))).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid payment hash"), "{body}");
}

#[actix_web::test]
async fn settle_failures_are_server_errors() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_settle()
        .times(1)
        .returning(|_| Err(SettlementError::LookupError(InvoiceLookupError::NodeError("connection reset".into()))));
    let (status, body) = post_request("", &settle_path(), None, configure_with(mock, None)).await.unwrap();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    let msg = json["error"].as_str().unwrap();
    assert!(msg.contains("safe to retry"), "{msg}");
    assert!(msg.contains("connection reset"), "{msg}");
}

#[actix_web::test]
async fn refresh_wallet() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_refresh_wallet()
        .withf(|w| w.as_str() == "wallet-42")
        .times(1)
        .returning(|_| Ok(ScanSummary { settled: 2, unsettled: 1, failed: 1 }));
    let (status, body) =
        post_request(TEST_TOKEN, "/wallet/wallet-42/refresh", None, configure_with(mock, Some(TEST_TOKEN)))
            .await
            .unwrap();
    assert_eq!(status, StatusCode::OK);
    let summary: ScanSummary = serde_json::from_str(&body).unwrap();
    assert_eq!(summary, ScanSummary { settled: 2, unsettled: 1, failed: 1 });
}

#[actix_web::test]
async fn refresh_wallet_requires_token() {
    let _ = env_logger::try_init().ok();
    let mut mock = MockSettlement::new();
    mock.expect_refresh_wallet().never();
    let (status, _) =
        post_request("", "/wallet/wallet-42/refresh", None, configure_with(mock, Some(TEST_TOKEN))).await.unwrap();
    assert_eq!(status, StatusCode::FORBIDDEN);
}
