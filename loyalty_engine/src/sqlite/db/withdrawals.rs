use sqlx::SqliteConnection;

use crate::{
    db_types::{NewWithdrawal, UserId, Withdrawal},
    traits::AccountApiError,
};

/// Appends a withdrawal record. This does not touch the account balance; see
/// [`super::accounts::debit_account`], and call both inside one transaction.
pub(crate) async fn insert_withdrawal(
    withdrawal: &NewWithdrawal,
    conn: &mut SqliteConnection,
) -> Result<Withdrawal, AccountApiError> {
    let inserted: Vec<Withdrawal> = sqlx::query_as(
        r#"
            INSERT INTO withdrawals (user_id, order_number, sum)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(&withdrawal.user_id)
    .bind(&withdrawal.order_number)
    .bind(withdrawal.sum)
    .fetch_all(conn)
    .await?;
    let withdrawal = inserted.into_iter().next().ok_or(sqlx::Error::RowNotFound)?;
    Ok(withdrawal)
}

/// Fetches the user's withdrawals, most recent first.
pub(crate) async fn fetch_withdrawals_for_user(
    user: &UserId,
    conn: &mut SqliteConnection,
) -> Result<Vec<Withdrawal>, AccountApiError> {
    let withdrawals =
        sqlx::query_as("SELECT * FROM withdrawals WHERE user_id = $1 ORDER BY processed_at DESC, id DESC")
            .bind(user)
            .fetch_all(conn)
            .await?;
    Ok(withdrawals)
}
