//! Timing and retry parameters for the refresh scheduler.

use std::time::Duration;

/// Startup retry policy.
///
/// The delay before retry `n` (1-based, counting failed attempts) is
/// `backoff × factor^(n-1)`, capped at `max_backoff`. With the default
/// `factor = 1.0` the delay is constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts allowed, including the first one.
    pub max_attempts: u32,
    pub backoff: Duration,
    pub factor: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(5),
            factor: 1.0,
            max_backoff: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after `failed_attempts` consecutive failures.
    pub fn delay_after(&self, failed_attempts: u32) -> Duration {
        let exponent = failed_attempts.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.factor.max(1.0);
        let scaled = self.backoff.as_secs_f64() * factor.powi(exponent);
        if !scaled.is_finite() || scaled >= self.max_backoff.as_secs_f64() {
            self.max_backoff
        } else {
            Duration::from_secs_f64(scaled)
        }
    }
}

/// Steady-state refresh parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshPolicy {
    /// Time between the end of one cycle and the start of the next.
    pub interval: Duration,
    /// Upper bound on a single upstream fetch.
    pub fetch_timeout: Duration,
    /// Look-ahead horizon for the transformer.
    pub window: chrono::Duration,
    /// Keep at most this many launches per snapshot.
    pub max_launches: Option<usize>,
    /// Consecutive failures after which each failure is logged as an error.
    pub alert_threshold: u64,
    pub retry: RetryPolicy,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
            fetch_timeout: Duration::from_secs(30),
            window: chrono::Duration::days(crate::services::FILTER_WINDOW_DAYS),
            max_launches: Some(8),
            alert_threshold: 3,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_secs(5));
        assert_eq!(policy.delay_after(4), Duration::from_secs(5));
    }

    #[test]
    fn test_growing_backoff_is_capped() {
        let policy = RetryPolicy {
            max_attempts: 10,
            backoff: Duration::from_secs(1),
            factor: 2.0,
            max_backoff: Duration::from_secs(10),
        };
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(policy.delay_after(5), Duration::from_secs(10));
        assert_eq!(policy.delay_after(u32::MAX), Duration::from_secs(10));
    }

    #[test]
    fn test_factor_below_one_is_constant() {
        let policy = RetryPolicy {
            factor: 0.5,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.delay_after(3), Duration::from_secs(5));
    }
}
