use log::*;
use loyalty_engine::{
    db_types::{OrderNumber, OrderStatusType, UserId},
    traits::{AccrualUpdate, OrderManagement},
    OrderUploadApi,
    SqliteDatabase,
};
use lps_common::Points;
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Creates a fresh, migrated database at `url`, replacing any database that is already there.
pub async fn prepare_test_env(url: &str) -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    create_database(url).await;
    let db = SqliteDatabase::new_with_url(url, 25).await.expect("Error creating connection to database");
    db.run_migrations().await.expect("Error running DB migrations");
    db
}

/// A unique database URL in the system's temporary directory.
pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("lps_test_store_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn create_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        trace!("Database {url} was not dropped: {e:?}");
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("Created Sqlite database {url}");
}

/// Uploads `number` for `user` and has it processed with the given accrual, crediting the user's account.
pub async fn process_order(db: &SqliteDatabase, user: &UserId, number: &str, accrual: Points) {
    let api = OrderUploadApi::new(db.clone());
    api.upload_order(user, number).await.expect("Error uploading order");
    let number = OrderNumber::new(number).expect("Invalid order number");
    let update = AccrualUpdate::new(number, OrderStatusType::Processed, accrual);
    db.apply_accrual_update(update).await.expect("Error applying accrual").expect("Order was not updated");
}
