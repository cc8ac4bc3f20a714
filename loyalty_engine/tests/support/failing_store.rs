use loyalty_engine::{
    db_types::{NewOrder, Order, OrderNumber, UserId},
    traits::{AccrualUpdate, InsertOrderResult, OrderManagement, OrderManagementError, OrderTransition},
    SqliteDatabase,
};

/// Wraps a real store, but refuses to apply accrual updates for one order number. Everything else is passed through.
#[derive(Clone)]
pub struct FailingStore {
    inner: SqliteDatabase,
    broken_order: String,
}

impl FailingStore {
    pub fn new(inner: SqliteDatabase, broken_order: &str) -> Self {
        Self { inner, broken_order: broken_order.to_string() }
    }
}

impl OrderManagement for FailingStore {
    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderManagementError> {
        self.inner.fetch_order_by_number(number).await
    }

    async fn fetch_orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, OrderManagementError> {
        self.inner.fetch_orders_for_user(user).await
    }

    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderManagementError> {
        self.inner.insert_order(order).await
    }

    async fn fetch_pending_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, OrderManagementError> {
        self.inner.fetch_pending_orders(limit).await
    }

    async fn apply_accrual_update(
        &self,
        update: AccrualUpdate,
    ) -> Result<Option<OrderTransition>, OrderManagementError> {
        if update.number.as_str() == self.broken_order {
            return Err(OrderManagementError::DatabaseError("database is locked".into()));
        }
        self.inner.apply_accrual_update(update).await
    }
}
