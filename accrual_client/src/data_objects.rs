use loyalty_engine::traits::OracleAccrual;
use lps_common::Points;
use serde::{Deserialize, Serialize};

/// The body of a `200 OK` reply from `GET /api/orders/{number}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResponse {
    pub order: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accrual: Option<Points>,
}

impl From<AccrualResponse> for OracleAccrual {
    fn from(value: AccrualResponse) -> Self {
        Self { order: value.order, status: value.status, accrual: value.accrual }
    }
}
