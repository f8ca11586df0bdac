//! Retry decorator for price sources.

use crate::domain::error::TradeAssistError;
use crate::domain::price_series::PriceSeries;
use crate::ports::price_source::PriceSource;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Wraps a [`PriceSource`] and retries `SourceUnavailable` failures with an
/// exponential backoff. Every other error is returned on the first attempt.
pub struct RetryingSource<S> {
    inner: S,
    max_attempts: u32,
    base_delay: Duration,
}

impl<S: PriceSource> RetryingSource<S> {
    pub fn new(inner: S, max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Delay after failed attempt `attempt` (zero-based): `base * 2^attempt`.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(1u32 << attempt.min(16))
    }
}

impl<S: PriceSource> PriceSource for RetryingSource<S> {
    fn fetch(&self, symbol: &str, lookback_days: u32) -> Result<PriceSeries, TradeAssistError> {
        let mut attempt = 0;
        loop {
            match self.inner.fetch(symbol, lookback_days) {
                Err(e) if e.is_unavailable() && attempt + 1 < self.max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        %symbol,
                        attempt = attempt + 1,
                        max_attempts = self.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "price fetch failed, retrying"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}
