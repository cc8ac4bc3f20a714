//! # Loyalty engine public API
//!
//! The `lps_api` module exposes the programmatic API for the loyalty engine. The API is modular, so that clients of the
//! API can pick and choose the functionality they want.
//!
//! * [`order_upload_api`] accepts order numbers from users and lists the orders they uploaded.
//! * [`balance_api`] reports balances, and debits them through withdrawals.
//!
//! # API usage
//!
//! An API instance is created by supplying a database backend that implements the backend traits required by the API.
//!
//! ```rust,ignore
//! use loyalty_engine::{BalanceApi, SqliteDatabase};
//! let db = SqliteDatabase::new_with_url("sqlite://data/loyalty.db", 25).await?;
//! // SqliteDatabase implements AccountManagement and WithdrawalLedger
//! let api = BalanceApi::new(db);
//! let account = api.balance(&user_id).await?;
//! ```
pub mod balance_api;
pub mod errors;
pub mod order_upload_api;
