use actix_web::{http::StatusCode, test, web, App};
use ln_payment_engine::{
    db_types::{NewWalletInvoice, Sats},
    test_utils::{
        node_pubkey,
        payment_hash,
        prepare_env::{prepare_test_env, random_db_path},
        wallet_id,
        FakeNode,
    },
    traits::InvoiceStore,
    DepositFeePolicy,
    EventProducers,
    ExchangeRate,
    ExchangeRateApi,
    MemoryPaymentLock,
    ScanSummary,
    SettlementApi,
    SqliteDatabase,
};
use ln_payment_server::{
    auth::SignalToken,
    routes::{RefreshWalletRoute, SettleInvoiceRoute},
};
use rust_decimal_macros::dec;

type TestSettlementApi = SettlementApi<
    SqliteDatabase,
    FakeNode,
    MemoryPaymentLock,
    SqliteDatabase,
    ExchangeRateApi<SqliteDatabase>,
    EventProducers,
>;

struct Fixture {
    db: SqliteDatabase,
    node: FakeNode,
    api: web::Data<TestSettlementApi>,
}

async fn fixture() -> Fixture {
    let url = random_db_path();
    prepare_test_env(&url).await;
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error connecting to database");
    let rates = ExchangeRateApi::new(db.clone(), "USD");
    rates.set_exchange_rate(&ExchangeRate::new("USD".into(), dec!(0.0003), None)).await.unwrap();
    let node = FakeNode::new();
    let api = SettlementApi::new(
        db.clone(),
        node.clone(),
        MemoryPaymentLock::new(),
        db.clone(),
        rates,
        EventProducers::default(),
    )
    .with_fee_policy(DepositFeePolicy::new(100));
    Fixture { db, node, api: web::Data::new(api) }
}

async fn post(f: &Fixture, path: &str) -> (StatusCode, String) {
    let app = App::new()
        .app_data(f.api.clone())
        .app_data(web::Data::new(SignalToken::default()))
        .service(SettleInvoiceRoute::<TestSettlementApi>::new())
        .service(RefreshWalletRoute::<TestSettlementApi>::new());
    let service = test::init_service(app).await;
    let req = test::TestRequest::post().uri(path).to_request();
    let res = test::call_service(&service, req).await;
    let status = res.status();
    let body = String::from_utf8_lossy(&test::read_body(res).await).into_owned();
    (status, body)
}

#[actix_web::test]
async fn repeated_signals_credit_once() {
    let f = fixture().await;
    let hash = payment_hash(7);
    let wallet = wallet_id("wallet-7");
    f.db.insert_invoice(NewWalletInvoice::new(hash.clone(), wallet.clone(), node_pubkey())).await.unwrap();
    let path = format!("/invoice/{hash}/settle");

    let (status, body) = post(&f, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"settled":false}"#);

    f.node.settle(&hash, Sats::from(10_000), "coffee");
    for _ in 0..3 {
        let (status, body) = post(&f, &path).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"settled":true}"#);
    }

    let entries = f.db.fetch_ledger_entries(&wallet).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].receipt.amount, Sats::from(10_000));
    assert_eq!(entries[0].receipt.fee, Sats::from(100));
    assert_eq!(entries[0].receipt.fiat_amount, dec!(3));
    assert_eq!(f.db.wallet_balance(&wallet).await.unwrap(), Sats::from(9_900));
}

#[actix_web::test]
async fn signals_for_unknown_invoices_are_ignored() {
    let f = fixture().await;
    let (status, body) = post(&f, &format!("/invoice/{}/settle", payment_hash(9))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"settled":false}"#);
    assert_eq!(f.node.lookups(), 0);
}

#[actix_web::test]
async fn refresh_settles_and_cleans_up() {
    let f = fixture().await;
    let wallet = wallet_id("wallet-r");
    let (paid, pending, stale) = (payment_hash(1), payment_hash(2), payment_hash(3));
    for hash in [&paid, &pending, &stale] {
        f.db.insert_invoice(NewWalletInvoice::new(hash.clone(), wallet.clone(), node_pubkey())).await.unwrap();
    }
    f.node.settle(&paid, Sats::from(2_000), "tea");
    f.node.add_pending(&pending, "cake");

    let (status, body) = post(&f, "/wallet/wallet-r/refresh").await;
    assert_eq!(status, StatusCode::OK);
    let summary: ScanSummary = serde_json::from_str(&body).unwrap();
    assert_eq!(summary, ScanSummary { settled: 1, unsettled: 2, failed: 0 });

    assert!(f.db.fetch_invoice_by_payment_hash(&paid).await.unwrap().unwrap().paid);
    assert!(!f.db.fetch_invoice_by_payment_hash(&pending).await.unwrap().unwrap().paid);
    assert!(f.db.fetch_invoice_by_payment_hash(&stale).await.unwrap().is_none());
    assert_eq!(f.db.wallet_balance(&wallet).await.unwrap(), Sats::from(1_980));
}
