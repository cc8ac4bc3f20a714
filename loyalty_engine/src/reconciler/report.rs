use std::{fmt::Display, time::Duration};

use lps_common::Points;

/// What happened during one reconciliation round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Orders the oracle was asked about.
    pub polled: usize,
    /// Orders whose status changed.
    pub updated: usize,
    /// Orders whose accrual was credited to their owner.
    pub credited: usize,
    pub credited_total: Points,
    /// Orders left as they were: unknown to the oracle, unchanged, unrecognised status, or oracle unavailable.
    pub skipped: usize,
    /// Orders whose update failed in storage.
    pub failed: usize,
    /// Set when the oracle throttled us and the round was cut short. Holds the oracle's requested back-off.
    pub rate_limited: Option<Duration>,
    /// Set when the round was interrupted by shutdown.
    pub cancelled: bool,
}

impl TickReport {
    pub fn is_aborted(&self) -> bool {
        self.rate_limited.is_some() || self.cancelled
    }
}

impl Display for TickReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "polled: {}, updated: {}, credited: {} ({}), skipped: {}, failed: {}",
            self.polled, self.updated, self.credited, self.credited_total, self.skipped, self.failed
        )?;
        if let Some(retry_after) = self.rate_limited {
            write!(f, ", rate limited (retry after {}s)", retry_after.as_secs())?;
        }
        if self.cancelled {
            write!(f, ", cancelled")?;
        }
        Ok(())
    }
}
