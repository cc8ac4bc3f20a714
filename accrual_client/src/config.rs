use std::time::Duration;

use log::*;

const DEFAULT_ACCRUAL_URL: &str = "http://127.0.0.1:8081";
const DEFAULT_ACCRUAL_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AccrualConfig {
    /// The scheme, host and port of the accrual service, e.g. `http://accrual.internal:8080`.
    pub base_url: String,
    /// Upper bound on the duration of a single request, including connecting and reading the body.
    pub timeout: Duration,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self { base_url: DEFAULT_ACCRUAL_URL.to_string(), timeout: DEFAULT_ACCRUAL_TIMEOUT }
    }
}

impl AccrualConfig {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self { base_url: base_url.trim_end_matches('/').to_string(), timeout }
    }

    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("LPS_ACCRUAL_URL").unwrap_or_else(|_| {
            warn!("🪛️ LPS_ACCRUAL_URL not set, using {DEFAULT_ACCRUAL_URL} as default");
            DEFAULT_ACCRUAL_URL.to_string()
        });
        let timeout = std::env::var("LPS_ACCRUAL_TIMEOUT")
            .ok()
            .and_then(|s| {
                s.parse::<u64>()
                    .map_err(|e| {
                        warn!("🪛️ Invalid LPS_ACCRUAL_TIMEOUT value ({s}): {e}. Using the default.");
                    })
                    .ok()
            })
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_ACCRUAL_TIMEOUT);
        Self::new(&base_url, timeout)
    }
}
