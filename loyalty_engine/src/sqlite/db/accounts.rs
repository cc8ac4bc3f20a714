use log::trace;
use lps_common::Points;
use sqlx::SqliteConnection;

use crate::{
    db_types::{Account, UserId},
    traits::AccountApiError,
};

/// Creates a zero-balance account for `user` if it does not exist yet, and returns the stored account.
pub(crate) async fn create_account(user: &UserId, conn: &mut SqliteConnection) -> Result<Account, AccountApiError> {
    let inserted = sqlx::query("INSERT INTO accounts (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user)
        .execute(&mut *conn)
        .await?;
    if inserted.rows_affected() > 0 {
        trace!("🗃️ Created account for user {user}");
    }
    fetch_account(user, conn).await?.ok_or_else(|| AccountApiError::AccountNotFound(user.clone()))
}

// Single-row queries in this module go through `fetch_all`, so every statement is stepped to completion and the
// pooled connection releases its read snapshot.
pub(crate) async fn fetch_account(
    user: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, AccountApiError> {
    let accounts: Vec<Account> =
        sqlx::query_as("SELECT * FROM accounts WHERE user_id = $1").bind(user).fetch_all(conn).await?;
    Ok(accounts.into_iter().next())
}

/// Adds `amount` to the user's current balance as a single server-side expression. If the user has no account yet, one
/// is opened with `amount` as its balance.
pub(crate) async fn credit_account(
    user: &UserId,
    amount: Points,
    conn: &mut SqliteConnection,
) -> Result<Account, AccountApiError> {
    let accounts: Vec<Account> = sqlx::query_as(
        r#"
            INSERT INTO accounts (user_id, current_balance) VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE SET
                current_balance = current_balance + excluded.current_balance,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(user)
    .bind(amount)
    .fetch_all(conn)
    .await?;
    let account = accounts.into_iter().next().ok_or(sqlx::Error::RowNotFound)?;
    trace!("🗃️ Credited {amount} to account of user {user}");
    Ok(account)
}

/// Moves `amount` from the user's current balance into their withdrawn total, as long as the balance covers it.
///
/// The guard is part of the `UPDATE` statement, so concurrent debits can never take the balance below zero. Returns
/// `None` when no row matched, i.e. the user has no account or the balance is too small.
pub(crate) async fn debit_account(
    user: &UserId,
    amount: Points,
    conn: &mut SqliteConnection,
) -> Result<Option<Account>, AccountApiError> {
    let accounts: Vec<Account> = sqlx::query_as(
        r#"
            UPDATE accounts SET
                current_balance = current_balance - $1,
                withdrawn = withdrawn + $1,
                updated_at = CURRENT_TIMESTAMP
            WHERE user_id = $2 AND current_balance >= $1
            RETURNING *;
        "#,
    )
    .bind(amount)
    .bind(user)
    .fetch_all(conn)
    .await?;
    Ok(accounts.into_iter().next())
}
