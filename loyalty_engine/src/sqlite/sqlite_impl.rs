//! `SqliteDatabase` is a concrete implementation of a loyalty engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the storage traits defined in the
//! [`crate::traits`] module.
use std::fmt::Debug;

use log::*;
use lps_common::Points;
use sqlx::{migrate, migrate::MigrateError, SqlitePool};

use super::db::{accounts, new_pool, orders, withdrawals};
use crate::{
    db_types::{Account, NewOrder, NewWithdrawal, Order, OrderNumber, OrderStatusType, UserId, Withdrawal},
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

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn fetch_order_by_number(&self, number: &OrderNumber) -> Result<Option<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_order_by_number(number, &mut conn).await
    }

    async fn fetch_orders_for_user(&self, user: &UserId) -> Result<Vec<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_for_user(user, &mut conn).await
    }

    async fn insert_order(&self, order: NewOrder) -> Result<InsertOrderResult, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        orders::idempotent_insert(order, &mut conn).await
    }

    async fn fetch_pending_orders(&self, limit: Option<u32>) -> Result<Vec<Order>, OrderManagementError> {
        let mut conn = self.pool.acquire().await?;
        orders::fetch_orders_with_status(&OrderStatusType::pending(), limit, &mut conn).await
    }

    /// In a single atomic transaction,
    /// * moves the order to its new status, if the state machine allows it. Otherwise nothing further is done.
    /// * if the order is now `PROCESSED` with a positive accrual, adds the accrual to the owner's current balance.
    async fn apply_accrual_update(
        &self,
        update: AccrualUpdate,
    ) -> Result<Option<OrderTransition>, OrderManagementError> {
        let mut tx = self.pool.begin().await?;
        let Some(order) = orders::update_order_status(&update, &mut tx).await? else {
            tx.rollback().await?;
            return Ok(None);
        };
        let mut credited = Points::ZERO;
        if order.status == OrderStatusType::Processed && order.accrual.is_positive() {
            accounts::credit_account(&order.owner_id, order.accrual, &mut tx)
                .await
                .map_err(|e| OrderManagementError::DatabaseError(e.to_string()))?;
            credited = order.accrual;
            debug!("🗃️ Order {} credited {credited} to user {}", order.number, order.owner_id);
        }
        tx.commit().await?;
        Ok(Some(OrderTransition { order, credited }))
    }
}

impl AccountManagement for SqliteDatabase {
    async fn create_account(&self, user: &UserId) -> Result<Account, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::create_account(user, &mut conn).await
    }

    async fn fetch_account(&self, user: &UserId) -> Result<Option<Account>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        accounts::fetch_account(user, &mut conn).await
    }
}

impl WithdrawalLedger for SqliteDatabase {
    /// The guarded debit is the first statement of the transaction, so the transaction holds the write lock for its
    /// whole duration.
    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<(Account, Withdrawal), AccountApiError> {
        let mut tx = self.pool.begin().await?;
        let account = match accounts::debit_account(&withdrawal.user_id, withdrawal.sum, &mut tx).await? {
            Some(account) => account,
            None => {
                // Nothing was written. Find out why.
                let err = match accounts::fetch_account(&withdrawal.user_id, &mut tx).await? {
                    Some(_) => AccountApiError::InsufficientFunds,
                    None => AccountApiError::AccountNotFound(withdrawal.user_id.clone()),
                };
                tx.rollback().await?;
                return Err(err);
            },
        };
        let record = withdrawals::insert_withdrawal(&withdrawal, &mut tx).await?;
        tx.commit().await?;
        debug!(
            "🗃️ Withdrawal #{} of {} by user {} recorded. Balance is now {}",
            record.id, record.sum, record.user_id, account.current_balance
        );
        Ok((account, record))
    }

    async fn fetch_withdrawals_for_user(&self, user: &UserId) -> Result<Vec<Withdrawal>, AccountApiError> {
        let mut conn = self.pool.acquire().await?;
        withdrawals::fetch_withdrawals_for_user(user, &mut conn).await
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("🗃️ Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Migrations are embedded in the binary.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }
}
