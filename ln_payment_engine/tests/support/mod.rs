use ln_payment_engine::{
    db_types::NewWalletInvoice,
    test_utils::{node_pubkey, payment_hash, wallet_id},
    SqliteDatabase,
};
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};
use tempfile::TempDir;

/// A migrated SQLite database in a temporary directory. The directory is removed when this is dropped.
pub struct TestDb {
    pub db: SqliteDatabase,
    _dir: TempDir,
}

pub async fn prepare_test_db() -> TestDb {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let dir = tempfile::tempdir().expect("Error creating temporary directory");
    let url = format!("sqlite://{}", dir.path().join("ln_payments.db").display());
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 5).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    debug!("🚀️ Test database ready at {url}");
    TestDb { db, _dir: dir }
}

pub fn new_invoice(seed: u8, wallet: &str) -> NewWalletInvoice {
    NewWalletInvoice::new(payment_hash(seed), wallet_id(wallet), node_pubkey())
}
