//! # Storage and collaborator contracts
//!
//! This module defines the behaviour that a storage backend, and the external accrual oracle, must expose in order to
//! be driven by the loyalty engine.
//!
//! * [`OrderManagement`] covers uploaded orders: inserting them, querying them by owner or by status, and applying
//!   the accrual oracle's decisions to them (including the balance credit that goes with a `PROCESSED` decision).
//! * [`AccountManagement`] covers the per-user points accounts.
//! * [`WithdrawalLedger`] covers the append-only debit ledger, and the atomic balance debit that goes with it.
//! * [`AccrualOracle`] is the network boundary to the external accrual service.
mod account_management;
mod accrual_oracle;
mod order_management;
mod withdrawal_ledger;

mod data_objects;

pub use account_management::{AccountApiError, AccountManagement};
pub use accrual_oracle::{AccrualOracle, OracleAccrual, OracleResult};
pub use data_objects::{AccrualUpdate, InsertOrderResult, OrderTransition};
pub use order_management::{OrderManagement, OrderManagementError};
pub use withdrawal_ledger::WithdrawalLedger;
