use std::{sync::Arc, time::Duration};

use log::*;
use loyalty_engine::{
    db_types::OrderNumber,
    traits::{AccrualOracle, OracleResult},
};
use reqwest::{header::RETRY_AFTER, Client, Response, StatusCode};

use crate::{config::AccrualConfig, data_objects::AccrualResponse, AccrualApiError};

/// The back-off assumed when a rate-limited reply carries no usable `Retry-After` header.
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);
/// Error bodies are only logged up to this many bytes.
const MAX_LOGGED_BODY: usize = 1024;

#[derive(Clone)]
pub struct AccrualApi {
    config: AccrualConfig,
    client: Arc<Client>,
}

/// What the accrual service said about an order, before it is translated into an [`OracleResult`].
#[derive(Debug)]
enum QueryOutcome {
    Found(AccrualResponse),
    NotRegistered,
    RateLimited(Duration),
}

impl AccrualApi {
    pub fn new(config: AccrualConfig) -> Result<Self, AccrualApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AccrualApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    pub fn config(&self) -> &AccrualConfig {
        &self.config
    }

    /// Fetches the accrual status of a single order. No retries are attempted.
    async fn fetch_accrual(&self, number: &OrderNumber) -> Result<QueryOutcome, AccrualApiError> {
        let url = self.url(&format!("/api/orders/{}", number.as_str()));
        trace!("🛰️ Sending accrual query: {url}");
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await?;
                let accrual = serde_json::from_slice::<AccrualResponse>(&body).map_err(|e| {
                    AccrualApiError::JsonError(format!("{e}. Body: {}", truncated(&body)))
                })?;
                trace!("🛰️ Order {number} is {} with accrual {:?}", accrual.status, accrual.accrual);
                Ok(QueryOutcome::Found(accrual))
            },
            StatusCode::NO_CONTENT => Ok(QueryOutcome::NotRegistered),
            StatusCode::TOO_MANY_REQUESTS => Ok(QueryOutcome::RateLimited(retry_after(&response))),
            status => {
                let body = response.bytes().await.unwrap_or_else(|e| {
                    debug!("🛰️ Could not read the body of the {status} reply from the accrual service. {e}");
                    Default::default()
                });
                Err(AccrualApiError::QueryError { status: status.as_u16(), message: truncated(&body) })
            },
        }
    }
}

impl AccrualOracle for AccrualApi {
    async fn query(&self, number: &OrderNumber) -> OracleResult {
        match self.fetch_accrual(number).await {
            Ok(QueryOutcome::Found(accrual)) => OracleResult::Accrual(accrual.into()),
            Ok(QueryOutcome::NotRegistered) => {
                debug!("🛰️ Order {number} is not registered with the accrual service");
                OracleResult::Unknown
            },
            Ok(QueryOutcome::RateLimited(retry_after)) => {
                warn!("🛰️ Accrual service is rate limiting requests. Retry after {}s", retry_after.as_secs());
                OracleResult::RateLimited { retry_after }
            },
            Err(e) => {
                warn!("🛰️ Accrual query for order {number} failed. {e}");
                OracleResult::Unavailable(e.to_string())
            },
        }
    }
}

/// Reads the `Retry-After` header as a number of seconds. Missing, malformed and non-positive values fall back to
/// [`DEFAULT_RETRY_AFTER`].
fn retry_after(response: &Response) -> Duration {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&secs| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_RETRY_AFTER)
}

fn truncated(body: &[u8]) -> String {
    let end = body.len().min(MAX_LOGGED_BODY);
    String::from_utf8_lossy(&body[..end]).into_owned()
}
