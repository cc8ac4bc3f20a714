use thiserror::Error;

use crate::db_types::{Account, UserId};

#[derive(Debug, Clone, Error)]
pub enum AccountApiError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("No account exists for user {0}")]
    AccountNotFound(UserId),
    #[error("Insufficient funds")]
    InsufficientFunds,
}

impl From<sqlx::Error> for AccountApiError {
    fn from(e: sqlx::Error) -> Self {
        AccountApiError::DatabaseError(e.to_string())
    }
}

/// The `AccountManagement` trait defines behaviour for managing the per-user points accounts.
///
/// Balances are never written directly through this trait. Credits happen as part of
/// [`crate::traits::OrderManagement::apply_accrual_update`] and debits as part of
/// [`crate::traits::WithdrawalLedger::record_withdrawal`].
#[allow(async_fn_in_trait)]
pub trait AccountManagement {
    /// Creates an empty account for `user`, or returns the existing one. Calling this more than once is harmless.
    async fn create_account(&self, user: &UserId) -> Result<Account, AccountApiError>;

    /// Fetches the account for `user`. If no account exists, `None` is returned.
    async fn fetch_account(&self, user: &UserId) -> Result<Option<Account>, AccountApiError>;
}
