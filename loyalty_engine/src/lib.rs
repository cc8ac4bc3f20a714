//! Loyalty Engine
//!
//! The loyalty engine is the core of the loyalty points server. Users upload the numbers of their purchase orders; an
//! external accrual service eventually decides whether each order is valid and how many points it earns; the engine
//! reflects that decision in a per-user balance that can also be spent through withdrawals.
//!
//! The library is divided into these main sections:
//! 1. Storage ([`mod@traits`] and [`mod@sqlite`]). The traits define the contracts a storage backend must honour, and
//!    SQLite is the supported backend. You should never need to access the database directly. The exception is the
//!    data types used in the database. These are defined in the [`mod@db_types`] module and are public.
//! 2. The public API ([`mod@lps_api`]), for accepting orders and for reading and spending balances.
//! 3. The [`mod@reconciler`], a background worker that polls the accrual service for outstanding orders and applies its
//!    decisions.
//!
//! Balances obey one invariant at all times: a user's current balance plus their withdrawn total equals the total
//! accrual of their `PROCESSED` orders. Every balance change is a single guarded statement inside the same transaction
//! as the event that caused it.
pub mod db_types;
pub mod helpers;
pub mod lps_api;
pub mod reconciler;
pub mod traits;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use lps_api::{
    balance_api::BalanceApi,
    errors::{BalanceApiError, OrderUploadError},
    order_upload_api::{OrderUploadApi, UploadOutcome},
};
pub use reconciler::{AccrualReconciler, ReconcilerConfig, TickReport};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
