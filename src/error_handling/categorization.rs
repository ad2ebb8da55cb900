//! Retry strategy for DNS queries.

use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

use crate::config::DNS_RETRY_MAX_DELAY_SECS;

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `base_delay`
/// - Backoff: the delay doubles with each retry
/// - Maximum delay: `DNS_RETRY_MAX_DELAY_SECS` seconds
/// - Maximum retries: `retries` (zero disables retrying)
///
/// # Returns
///
/// A retry strategy iterator ready for use with `tokio_retry::RetryIf`.
pub fn get_retry_strategy(retries: usize, base_delay: Duration) -> impl Iterator<Item = Duration> {
    // from_millis(2) yields 2, 4, 8, ...; the factor turns that into base, 2*base, 4*base
    let half_base_ms = (base_delay.as_millis() / 2).max(1);
    let factor = u64::try_from(half_base_ms).unwrap_or(u64::MAX);

    ExponentialBackoff::from_millis(2)
        .factor(factor)
        .max_delay(Duration::from_secs(DNS_RETRY_MAX_DELAY_SECS))
        .take(retries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_strategy_respects_retry_count() {
        assert_eq!(get_retry_strategy(0, Duration::from_millis(200)).count(), 0);
        assert_eq!(get_retry_strategy(1, Duration::from_millis(200)).count(), 1);
        assert_eq!(get_retry_strategy(3, Duration::from_millis(200)).count(), 3);
    }

    #[test]
    fn test_retry_strategy_backs_off() {
        let delays: Vec<Duration> = get_retry_strategy(3, Duration::from_millis(200)).collect();
        assert_eq!(delays[0], Duration::from_millis(200));
        assert_eq!(delays[1], Duration::from_millis(400));
        assert_eq!(delays[2], Duration::from_millis(800));
    }

    #[test]
    fn test_retry_strategy_caps_delay() {
        let delays: Vec<Duration> = get_retry_strategy(8, Duration::from_millis(500)).collect();
        for delay in delays {
            assert!(delay <= Duration::from_secs(DNS_RETRY_MAX_DELAY_SECS));
        }
    }
}
