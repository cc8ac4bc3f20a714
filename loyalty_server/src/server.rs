use std::{path::Path, time::Duration};

use accrual_client::AccrualApi;
use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use log::*;
use loyalty_engine::{BalanceApi, OrderUploadApi, SqliteDatabase};
use tokio_util::sync::CancellationToken;

use crate::{
    accrual_worker::start_accrual_worker,
    auth::UserIdHeader,
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        json_config,
        MyBalanceRoute,
        MyOrdersRoute,
        MyWithdrawalsRoute,
        OpenAccountRoute,
        UploadOrderRoute,
        WithdrawRoute,
    },
};

/// Opens (and migrates) the database, starts the accrual worker and serves requests until the server receives a
/// shutdown signal. The worker is then cancelled and awaited before returning.
pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    create_database_directory(&config.database_url)?;
    let db = SqliteDatabase::new_with_url(&config.database_url, config.db_max_connections)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(format!("Migrations failed. {e}")))?;
    info!("🗃️ Database ready at {}", db.url());

    let shutdown = CancellationToken::new();
    let worker = if config.reconciler_enabled {
        let oracle = AccrualApi::new(config.accrual.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Some(start_accrual_worker(db.clone(), oracle, config.reconciler.clone(), shutdown.clone()))
    } else {
        None
    };

    let srv = create_server_instance(config, db)?;
    let result = srv.await.map_err(|e| ServerError::Unspecified(e.to_string()));

    shutdown.cancel();
    if let Some(worker) = worker {
        if let Err(e) = worker.await {
            error!("🔄️ The accrual worker did not shut down cleanly. {e}");
        }
    }
    result
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let user_id_header = UserIdHeader::new(&config.user_id_header);
    let srv = HttpServer::new(move || {
        let upload_api = OrderUploadApi::new(db.clone());
        let balance_api = BalanceApi::new(db.clone());
        let api_scope = web::scope("/api")
            .service(OpenAccountRoute::<SqliteDatabase>::new())
            .service(UploadOrderRoute::<SqliteDatabase>::new())
            .service(MyOrdersRoute::<SqliteDatabase>::new())
            .service(MyBalanceRoute::<SqliteDatabase>::new())
            .service(WithdrawRoute::<SqliteDatabase>::new())
            .service(MyWithdrawalsRoute::<SqliteDatabase>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("lps::access_log"))
            .app_data(user_id_header.clone())
            .app_data(json_config())
            .app_data(web::Data::new(upload_api))
            .app_data(web::Data::new(balance_api))
            .service(health)
            .service(api_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// SQLite creates missing database files, but not missing directories.
fn create_database_directory(url: &str) -> Result<(), ServerError> {
    let Some(path) = url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    match Path::new(path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            info!("🗃️ Creating database directory {}", dir.display());
            std::fs::create_dir_all(dir)?;
            Ok(())
        },
        _ => Ok(()),
    }
}
