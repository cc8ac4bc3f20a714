use std::{env, fmt::Display, str::FromStr, time::Duration};

use accrual_client::AccrualConfig;
use log::*;
use loyalty_engine::ReconcilerConfig;
use lps_common::parse_boolean_flag;

use crate::auth::DEFAULT_USER_ID_HEADER;

const DEFAULT_LPS_HOST: &str = "127.0.0.1";
const DEFAULT_LPS_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/loyalty.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 25;
const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// The request header that carries the id of the authenticated user. It is set by the authentication gateway in
    /// front of this server, and must never be accepted from clients directly.
    pub user_id_header: String,
    pub accrual: AccrualConfig,
    pub reconciler: ReconcilerConfig,
    /// If false, orders are accepted but never reconciled. Useful when several servers share a database.
    pub reconciler_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_LPS_HOST.to_string(),
            port: DEFAULT_LPS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            db_max_connections: DEFAULT_DB_MAX_CONNECTIONS,
            user_id_header: DEFAULT_USER_ID_HEADER.to_string(),
            accrual: AccrualConfig::default(),
            reconciler: ReconcilerConfig { tick_interval: DEFAULT_RECONCILE_INTERVAL, batch_size: None },
            reconciler_enabled: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("LPS_HOST").ok().unwrap_or_else(|| DEFAULT_LPS_HOST.into());
        let port = parse_env("LPS_PORT", DEFAULT_LPS_PORT);
        let database_url = env::var("LPS_DATABASE_URL").ok().unwrap_or_else(|| {
            warn!("🪛️ LPS_DATABASE_URL is not set. Using {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.into()
        });
        let db_max_connections = match parse_env("LPS_DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS) {
            0 => {
                warn!("🪛️ LPS_DB_MAX_CONNECTIONS must be at least 1. Using {DEFAULT_DB_MAX_CONNECTIONS}.");
                DEFAULT_DB_MAX_CONNECTIONS
            },
            n => n,
        };
        let user_id_header = env::var("LPS_USER_ID_HEADER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_USER_ID_HEADER.into());
        let accrual = AccrualConfig::new_from_env_or_default();
        let tick_interval = match parse_env("LPS_RECONCILE_INTERVAL", DEFAULT_RECONCILE_INTERVAL.as_secs()) {
            0 => {
                warn!("🪛️ LPS_RECONCILE_INTERVAL must be at least 1 second. Using the default.");
                DEFAULT_RECONCILE_INTERVAL
            },
            secs => Duration::from_secs(secs),
        };
        let batch_size = env::var("LPS_RECONCILE_BATCH_SIZE").ok().and_then(|s| match s.trim().parse::<u32>() {
            Ok(0) => {
                warn!("🪛️ LPS_RECONCILE_BATCH_SIZE of 0 would never poll anything. Polling all orders instead.");
                None
            },
            Ok(n) => Some(n),
            Err(e) => {
                warn!("🪛️ {s} is not a valid value for LPS_RECONCILE_BATCH_SIZE. {e} Polling all orders instead.");
                None
            },
        });
        let reconciler_enabled = parse_boolean_flag(env::var("LPS_RECONCILER_ENABLED").ok(), true);
        if !reconciler_enabled {
            warn!("🪛️ The accrual reconciler is disabled. Uploaded orders will not be credited.");
        }
        Self {
            host,
            port,
            database_url,
            db_max_connections,
            user_id_header,
            accrual,
            reconciler: ReconcilerConfig { tick_interval, batch_size },
            reconciler_enabled,
        }
    }
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(name) {
        Ok(s) => s.trim().parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
        Err(_) => default,
    }
}
