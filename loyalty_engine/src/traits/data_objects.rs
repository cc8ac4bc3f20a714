use lps_common::Points;

use crate::db_types::{Order, OrderNumber, OrderStatusType};

#[derive(Debug, Clone)]
pub enum InsertOrderResult {
    Inserted(Order),
    /// An order with the same number was already stored. The existing row is untouched.
    AlreadyExists,
}

/// A status (and accrual) change for a single order, as decided by the accrual oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualUpdate {
    pub number: OrderNumber,
    pub status: OrderStatusType,
    pub accrual: Points,
}

impl AccrualUpdate {
    pub fn new(number: OrderNumber, status: OrderStatusType, accrual: Points) -> Self {
        Self { number, status, accrual }
    }
}

/// The result of an applied [`AccrualUpdate`].
#[derive(Debug, Clone)]
pub struct OrderTransition {
    /// The order, as it is stored after the update.
    pub order: Order,
    /// The amount credited to the owner's account as part of the same transaction. Zero unless the order moved to
    /// `PROCESSED` with a positive accrual.
    pub credited: Points,
}
