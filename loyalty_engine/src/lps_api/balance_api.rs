//! Points balances and withdrawals.

use std::fmt::Debug;

use log::*;
use lps_common::Points;

use crate::{
    db_types::{Account, NewWithdrawal, OrderNumber, UserId, Withdrawal},
    lps_api::errors::BalanceApiError,
    traits::{AccountManagement, WithdrawalLedger},
};

pub struct BalanceApi<B> {
    db: B,
}

impl<B: Debug> Debug for BalanceApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BalanceApi ({:?})", self.db)
    }
}

impl<B> BalanceApi<B>
where B: AccountManagement + WithdrawalLedger
{
    pub fn new(db: B) -> Self {
        Self { db }
    }

    /// Opens a zero-balance account for `user`. If the user already has an account, it is returned unchanged.
    pub async fn open_account(&self, user: &UserId) -> Result<Account, BalanceApiError> {
        let account = self.db.create_account(user).await?;
        debug!("💰️ Account for user {user} is open");
        Ok(account)
    }

    pub async fn balance(&self, user: &UserId) -> Result<Account, BalanceApiError> {
        self.db.fetch_account(user).await?.ok_or_else(|| {
            debug!("💰️ Balance requested for user {user}, who has no account");
            BalanceApiError::UserNotFound(user.clone())
        })
    }

    /// Spends `sum` points from the user's balance on the order `order_number`.
    ///
    /// The order number must pass the Luhn check, but need not be one of the user's uploaded orders. The sum must be
    /// positive and no larger than the current balance. When the withdrawal fails, nothing is written.
    pub async fn withdraw(
        &self,
        user: &UserId,
        order_number: &str,
        sum: Points,
    ) -> Result<Withdrawal, BalanceApiError> {
        let order_number = OrderNumber::new(order_number)?;
        if !sum.is_positive() {
            return Err(BalanceApiError::InvalidAmount(format!("{sum} is not a positive amount")));
        }
        let withdrawal = NewWithdrawal::new(user.clone(), order_number, sum);
        match self.db.record_withdrawal(withdrawal).await {
            Ok((account, record)) => {
                info!(
                    "💰️ User {user} withdrew {sum} for order {}. Balance: {}, withdrawn: {}",
                    record.order_number, account.current_balance, account.withdrawn
                );
                Ok(record)
            },
            Err(e) => {
                debug!("💰️ Withdrawal of {sum} by user {user} failed. {e}");
                Err(e.into())
            },
        }
    }

    /// The user's withdrawals, most recent first.
    pub async fn withdrawals(&self, user: &UserId) -> Result<Vec<Withdrawal>, BalanceApiError> {
        let withdrawals = self.db.fetch_withdrawals_for_user(user).await?;
        trace!("💰️ User {user} has {} withdrawals", withdrawals.len());
        Ok(withdrawals)
    }
}
