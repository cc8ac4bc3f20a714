use loyalty_engine::{
    db_types::{Account, NewOrder, NewWithdrawal, Order, OrderNumber, UserId, Withdrawal},
    traits::{
        AccountApiError,
        AccountManagement,
        AccrualUpdate,
        InsertOrderResult,
        OrderManagement,
        OrderManagementError,
        OrderTransition,
        WithdrawalLedger,
    },
};
use mockall::mock;

mock! {
    pub OrderManager {}
    impl OrderManagement for OrderManager {
        async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderManagementError>;
        async fn fetch_orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, OrderManagementError>;
        async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderManagementError>;
        async fn fetch_pending_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, OrderManagementError>;
        async fn apply_accrual_update(&self, update: AccrualUpdate) -> Result<Option<OrderTransition>, OrderManagementError>;
    }
}

mock! {
    pub AccountManager {}
    impl AccountManagement for AccountManager {
        async fn create_account(&self, user: &UserId) -> Result<Account, AccountApiError>;
        async fn fetch_account(&self, user: &UserId) -> Result<Option<Account>, AccountApiError>;
    }
    impl WithdrawalLedger for AccountManager {
        async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<(Account, Withdrawal), AccountApiError>;
        async fn fetch_withdrawals_for_user(&self, user: &UserId) -> Result<Vec<Withdrawal>, AccountApiError>;
    }
}
