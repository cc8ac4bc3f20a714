use std::time::Duration;

use lps_common::Points;

use crate::db_types::OrderNumber;

/// The accrual oracle's report on a single order, in the oracle's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleAccrual {
    pub order: String,
    /// One of `REGISTERED`, `PROCESSING`, `INVALID` or `PROCESSED`, although callers must cope with anything else.
    pub status: String,
    pub accrual: Option<Points>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleResult {
    Accrual(OracleAccrual),
    /// The oracle does not know about this order (yet).
    Unknown,
    /// The oracle is throttling us. No further requests should be made until the next polling round.
    RateLimited { retry_after: Duration },
    /// Transport failure, timeout, or any other unexpected response.
    Unavailable(String),
}

/// Queries the external accrual service for the status of an order.
///
/// Implementations do not retry, and must bound every call with a request timeout. Callers may cancel a query at any
/// time by dropping the future.
#[allow(async_fn_in_trait)]
pub trait AccrualOracle {
    async fn query(&self, number: &OrderNumber) -> OracleResult;
}
