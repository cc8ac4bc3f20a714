//! A thin client for the external accrual service.
//!
//! [`AccrualApi`] implements the loyalty engine's [`loyalty_engine::traits::AccrualOracle`] trait, so that the
//! reconciler can poll the service for the status of uploaded orders.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::AccrualApi;
pub use config::AccrualConfig;
pub use data_objects::AccrualResponse;
pub use error::AccrualApiError;
