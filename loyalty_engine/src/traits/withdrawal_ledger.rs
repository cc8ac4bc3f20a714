use crate::{
    db_types::{Account, NewWithdrawal, UserId, Withdrawal},
    traits::AccountApiError,
};

/// The `WithdrawalLedger` trait defines the append-only ledger of balance debits.
#[allow(async_fn_in_trait)]
pub trait WithdrawalLedger {
    /// Debits `withdrawal.sum` from the user's current balance, adds it to their withdrawn total and appends the
    /// withdrawal record, all in one atomic operation.
    ///
    /// The debit is guarded in the database, so that concurrent withdrawals can never overdraw the account.
    ///
    /// Returns the updated account and the new ledger entry.
    ///
    /// # Errors
    /// * [`AccountApiError::InsufficientFunds`] if the sum exceeds the current balance. Nothing is written.
    /// * [`AccountApiError::AccountNotFound`] if the user has no account.
    async fn record_withdrawal(&self, withdrawal: NewWithdrawal) -> Result<(Account, Withdrawal), AccountApiError>;

    /// Fetches all of the user's withdrawals, most recent first.
    async fn fetch_withdrawals_for_user(&self, user: &UserId) -> Result<Vec<Withdrawal>, AccountApiError>;
}
