use chrono::{DateTime, Utc};
use loyalty_engine::db_types::{Account, Order, OrderStatusType, Withdrawal};
use lps_common::Points;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BalanceResponse {
    pub current: Points,
    pub withdrawn: Points,
}

impl From<Account> for BalanceResponse {
    fn from(account: Account) -> Self {
        Self { current: account.current_balance, withdrawn: account.withdrawn }
    }
}

/// An uploaded order, as reported to its owner. The accrual is only present once the order is `PROCESSED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub number: String,
    pub status: OrderStatusType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub accrual: Option<Points>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let accrual = (order.status == OrderStatusType::Processed).then_some(order.accrual);
        let number = order.number.as_str().to_string();
        Self { number, status: order.status, accrual, uploaded_at: order.uploaded_at }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawRequest {
    pub order: String,
    pub sum: Points,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalResponse {
    pub order: String,
    pub sum: Points,
    pub processed_at: DateTime<Utc>,
}

impl From<Withdrawal> for WithdrawalResponse {
    fn from(w: Withdrawal) -> Self {
        Self { order: w.order_number.as_str().to_string(), sum: w.sum, processed_at: w.processed_at }
    }
}
