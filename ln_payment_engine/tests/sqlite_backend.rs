use chrono::{Duration, Utc};
use futures_util::TryStreamExt;
use ln_payment_engine::{
    db_types::{LedgerAccountId, LnPaymentReceipt, Sats},
    test_utils::{payment_hash as hash, wallet_id as wallet},
    traits::{ExchangeRateError, ExchangeRates, InvoiceStore, InvoiceStoreError, LedgerError, LedgerPoster},
    ExchangeRate,
};
use rust_decimal_macros::dec;
use support::{new_invoice, prepare_test_db};

mod support;

#[tokio::test]
async fn invoice_lifecycle() {
    let test = prepare_test_db().await;
    let db = &test.db;

    let invoice = db.insert_invoice(new_invoice(1, "alice")).await.unwrap();
    assert!(!invoice.paid);
    let err = db.insert_invoice(new_invoice(1, "alice")).await.unwrap_err();
    assert!(matches!(err, InvoiceStoreError::InvoiceAlreadyExists(h) if h == hash(1)));

    let fetched = db.fetch_invoice_by_payment_hash(&hash(1)).await.unwrap().unwrap();
    assert_eq!(fetched.wallet_id, wallet("alice"));
    assert!(db.fetch_invoice_by_payment_hash(&hash(2)).await.unwrap().is_none());

    let mut paid = fetched.clone();
    paid.paid = true;
    let updated = db.update_invoice(&paid).await.unwrap();
    assert!(updated.paid);
    assert!(db.fetch_invoice_by_payment_hash(&hash(1)).await.unwrap().unwrap().paid);

    db.delete_invoice_by_payment_hash(&hash(1)).await.unwrap();
    db.delete_invoice_by_payment_hash(&hash(1)).await.unwrap();
    assert!(db.fetch_invoice_by_payment_hash(&hash(1)).await.unwrap().is_none());
    let err = db.update_invoice(&paid).await.unwrap_err();
    assert!(matches!(err, InvoiceStoreError::InvoiceNotFound(_)));
}

#[tokio::test]
async fn pending_invoices_are_streamed_per_wallet() {
    let test = prepare_test_db().await;
    let db = &test.db;
    for (seed, owner) in [(1, "alice"), (2, "alice"), (3, "bob"), (4, "alice")] {
        db.insert_invoice(new_invoice(seed, owner)).await.unwrap();
    }
    let mut paid = db.fetch_invoice_by_payment_hash(&hash(2)).await.unwrap().unwrap();
    paid.paid = true;
    db.update_invoice(&paid).await.unwrap();

    let alice = wallet("alice");
    let pending = db.fetch_pending_invoices_for_wallet(&alice).try_collect::<Vec<_>>().await.unwrap();
    let mut hashes = pending.into_iter().map(|i| i.payment_hash).collect::<Vec<_>>();
    hashes.sort();
    assert_eq!(hashes, vec![hash(1), hash(4)]);

    let wallets = db.fetch_wallets_with_pending_invoices().await.unwrap();
    assert_eq!(wallets, vec![wallet("alice"), wallet("bob")]);
}

#[tokio::test]
async fn ledger_rejects_duplicate_credits() {
    let test = prepare_test_db().await;
    let db = &test.db;
    let alice = wallet("alice");
    let receipt = LnPaymentReceipt {
        account: LedgerAccountId::liabilities_for(&alice),
        payment_hash: hash(7),
        description: "coffee".into(),
        amount: Sats::from(10_000),
        fee: Sats::from(100),
        fiat_amount: dec!(3.0000),
        fiat_fee: dec!(0.03),
    };
    db.receive_ln_payment(receipt.clone()).await.unwrap();
    let err = db.receive_ln_payment(receipt.clone()).await.unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateEntry(h) if h == hash(7)));

    let entry = db.fetch_ledger_entry(&hash(7)).await.unwrap().unwrap();
    assert_eq!(entry.receipt, receipt);
    assert_eq!(db.fetch_ledger_entries(&alice).await.unwrap().len(), 1);
    assert_eq!(db.wallet_balance(&alice).await.unwrap(), Sats::from(9_900));
    assert_eq!(db.wallet_balance(&wallet("bob")).await.unwrap(), Sats::from(0));
}

#[tokio::test]
async fn latest_exchange_rate_wins() {
    let test = prepare_test_db().await;
    let db = &test.db;
    let err = db.fetch_last_rate("USD").await.unwrap_err();
    assert!(matches!(err, ExchangeRateError::RateDoesNotExist(_)));

    let earlier = Utc::now() - Duration::hours(1);
    db.set_exchange_rate(&ExchangeRate::new("USD".into(), dec!(0.0005), Some(earlier))).await.unwrap();
    db.set_exchange_rate(&ExchangeRate::new("USD".into(), dec!(0.0006), None)).await.unwrap();
    db.set_exchange_rate(&ExchangeRate::new("EUR".into(), dec!(0.00055), None)).await.unwrap();

    let rate = db.fetch_last_rate("USD").await.unwrap();
    assert_eq!(rate.rate, dec!(0.0006));
    assert_eq!(rate.currency, "USD");
    assert_eq!(db.fetch_last_rate("EUR").await.unwrap().rate, dec!(0.00055));
}
