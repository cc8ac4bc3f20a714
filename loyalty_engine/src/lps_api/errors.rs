use thiserror::Error;

use crate::{
    db_types::{InvalidOrderNumber, OrderNumber, UserId},
    traits::{AccountApiError, OrderManagementError},
};

#[derive(Debug, Clone, Error)]
pub enum OrderUploadError {
    #[error("{0}")]
    InvalidOrderNumber(#[from] InvalidOrderNumber),
    #[error("Order {0} has already been uploaded by another user")]
    OwnedByAnotherUser(OrderNumber),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<OrderManagementError> for OrderUploadError {
    fn from(e: OrderManagementError) -> Self {
        match e {
            OrderManagementError::DatabaseError(s) => Self::DatabaseError(s),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum BalanceApiError {
    #[error("{0}")]
    InvalidOrderNumber(#[from] InvalidOrderNumber),
    #[error("Invalid withdrawal amount: {0}")]
    InvalidAmount(String),
    #[error("User {0} does not have a points account")]
    UserNotFound(UserId),
    #[error("Insufficient funds")]
    InsufficientFunds,
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<AccountApiError> for BalanceApiError {
    fn from(e: AccountApiError) -> Self {
        match e {
            AccountApiError::DatabaseError(s) => Self::DatabaseError(s),
            AccountApiError::AccountNotFound(user) => Self::UserNotFound(user),
            AccountApiError::InsufficientFunds => Self::InsufficientFunds,
        }
    }
}
