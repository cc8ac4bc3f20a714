//! # Accrual reconciliation
//!
//! The [`AccrualReconciler`] is the background worker that brings uploaded orders to their final state. On a fixed
//! period, it fetches every order that is not yet `INVALID` or `PROCESSED`, asks the [`AccrualOracle`] about each of
//! them in turn, and applies the answer through [`OrderManagement::apply_accrual_update`], which also credits the
//! owner's balance when an order is accepted.
//!
//! Orders are polled sequentially, oldest upload first. When the oracle rate-limits us, the rest of the round is
//! abandoned, and all outstanding orders are polled again on the next tick. The oracle's `Retry-After` hint is
//! recorded in the [`TickReport`] but the polling period is not adjusted.
mod report;
mod status_map;

use std::time::Duration;

use log::*;
use lps_common::Points;
pub use report::TickReport;
pub use status_map::map_oracle_status;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
    db_types::Order,
    traits::{AccrualOracle, AccrualUpdate, OracleAccrual, OracleResult, OrderManagement},
};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ReconcilerConfig {
    pub tick_interval: Duration,
    /// The maximum number of orders polled per round. `None` polls every outstanding order.
    pub batch_size: Option<u32>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self { tick_interval: DEFAULT_TICK_INTERVAL, batch_size: None }
    }
}

pub struct AccrualReconciler<B, O> {
    db: B,
    oracle: O,
    config: ReconcilerConfig,
}

impl<B, O> AccrualReconciler<B, O>
where
    B: OrderManagement,
    O: AccrualOracle,
{
    pub fn new(db: B, oracle: O, config: ReconcilerConfig) -> Self {
        Self { db, oracle, config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Runs reconciliation rounds on a fixed period until `shutdown` is cancelled. The first round starts immediately.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut timer = tokio::time::interval(self.config.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🔄️ Accrual reconciler started. Polling every {}ms", self.config.tick_interval.as_millis());
        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = timer.tick() => {},
            }
            let report = self.run_tick(&shutdown).await;
            if report.polled > 0 || report.is_aborted() {
                info!("🔄️ Reconciliation round complete. {report}");
            } else {
                trace!("🔄️ Nothing to reconcile");
            }
            if report.cancelled {
                break;
            }
        }
        info!("🔄️ Accrual reconciler stopped");
    }

    /// Runs a single reconciliation round.
    ///
    /// Shutdown is checked before every order, and an in-flight oracle query is abandoned as soon as `shutdown` is
    /// cancelled. Storage errors on individual orders are logged and counted, but do not stop the round.
    pub async fn run_tick(&self, shutdown: &CancellationToken) -> TickReport {
        let mut report = TickReport::default();
        let orders = match self.db.fetch_pending_orders(self.config.batch_size).await {
            Ok(orders) => orders,
            Err(e) => {
                error!("🔄️ Could not fetch outstanding orders. {e}");
                return report;
            },
        };
        trace!("🔄️ {} outstanding orders", orders.len());
        for order in orders {
            if shutdown.is_cancelled() {
                report.cancelled = true;
                break;
            }
            report.polled += 1;
            let result = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    debug!("🔄️ Shutdown requested while querying order {}", order.number);
                    report.cancelled = true;
                    break;
                },
                result = self.oracle.query(&order.number) => result,
            };
            match result {
                OracleResult::Accrual(accrual) => self.apply(&order, accrual, &mut report).await,
                OracleResult::Unknown => {
                    trace!("🔄️ Order {} is not known to the accrual service yet", order.number);
                    report.skipped += 1;
                },
                OracleResult::Unavailable(reason) => {
                    warn!("🔄️ Accrual service could not report on order {}. {reason}", order.number);
                    report.skipped += 1;
                },
                OracleResult::RateLimited { retry_after } => {
                    warn!(
                        "🔄️ Accrual service is rate limiting us (retry after {}s). Abandoning this round.",
                        retry_after.as_secs()
                    );
                    report.rate_limited = Some(retry_after);
                    break;
                },
            }
        }
        report
    }

    async fn apply(&self, order: &Order, response: OracleAccrual, report: &mut TickReport) {
        let Some(status) = map_oracle_status(&response.status) else {
            debug!("🔄️ Order {} has unrecognised status '{}'. Leaving it alone", order.number, response.status);
            report.skipped += 1;
            return;
        };
        if status == order.status {
            trace!("🔄️ Order {} is still {status}", order.number);
            report.skipped += 1;
            return;
        }
        let accrual = response.accrual.unwrap_or(Points::ZERO);
        let update = AccrualUpdate::new(order.number.clone(), status, accrual);
        match self.db.apply_accrual_update(update).await {
            Ok(Some(transition)) => {
                report.updated += 1;
                info!("🔄️ Order {} moved from {} to {status}", order.number, order.status);
                if transition.credited.is_positive() {
                    report.credited += 1;
                    report.credited_total += transition.credited;
                    info!("🔄️ Credited {} to user {}", transition.credited, transition.order.owner_id);
                }
            },
            Ok(None) => {
                debug!("🔄️ Order {} cannot move from {} to {status}. Ignoring", order.number, order.status);
                report.skipped += 1;
            },
            Err(e) => {
                error!("🔄️ Could not apply the accrual update for order {}. {e}", order.number);
                report.failed += 1;
            },
        }
    }
}
