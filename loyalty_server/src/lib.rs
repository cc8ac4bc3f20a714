//! # Loyalty points server
//! This crate hosts the HTTP front end of the loyalty points system. It is responsible for:
//! * Accepting purchase-order numbers uploaded by users.
//! * Reporting balances, orders and withdrawals, and accepting withdrawal requests.
//! * Running the accrual reconciler in the background, which polls the accrual service for outstanding orders and
//!   credits balances when orders are accepted.
//!
//! Users are identified by a header set by the authentication gateway in front of this server. See [auth].
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `POST /api/user/account`: Opens a points account for the user.
//! * `POST /api/user/orders`: Uploads an order number (plain text body).
//! * `GET /api/user/orders`: The user's uploaded orders, most recent first.
//! * `GET /api/user/balance`: The user's current balance and withdrawn total.
//! * `POST /api/user/balance/withdraw`: Spends points on an order.
//! * `GET /api/user/withdrawals`: The user's withdrawals, most recent first.

pub mod accrual_worker;
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
