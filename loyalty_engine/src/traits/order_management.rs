use thiserror::Error;

use crate::{
    db_types::{NewOrder, Order, OrderNumber, UserId},
    traits::{AccrualUpdate, InsertOrderResult, OrderTransition},
};

#[derive(Debug, Clone, Error)]
pub enum OrderManagementError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for OrderManagementError {
    fn from(e: sqlx::Error) -> Self {
        OrderManagementError::DatabaseError(e.to_string())
    }
}

/// The `OrderManagement` trait defines the behaviour for storing and querying uploaded orders in the database backend.
#[allow(async_fn_in_trait)]
pub trait OrderManagement {
    /// Fetches the order with the given number. If no such order exists, `None` is returned.
    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderManagementError>;

    /// Fetches all the orders owned by `user`, most recently uploaded first.
    async fn fetch_orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, OrderManagementError>;

    /// Stores a new order with status `NEW` and zero accrual.
    ///
    /// Order numbers are globally unique. If the number has already been stored (by anyone), nothing is written and
    /// [`InsertOrderResult::AlreadyExists`] is returned. Callers resolve the conflict by re-reading the order.
    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderManagementError>;

    /// Fetches the orders that have not reached a terminal status yet, oldest uploads first. If `limit` is given, at
    /// most that many orders are returned.
    async fn fetch_pending_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, OrderManagementError>;

    /// Applies the oracle's decision for one order.
    ///
    /// The update only takes effect if the stored status is a legal predecessor of `update.status`. Terminal orders,
    /// backward moves and repeated updates are therefore no-ops, and `None` is returned for them.
    ///
    /// When the new status is `PROCESSED` and the accrual is positive, the owner's account is credited with the accrual
    /// in the same transaction as the status change. An order is thus credited exactly once.
    async fn apply_accrual_update(&self, update: AccrualUpdate)
        -> Result<Option<OrderTransition>, OrderManagementError>;
}
