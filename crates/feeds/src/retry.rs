//! Bounded retry policy with exponential backoff.

use rand::Rng;
use std::time::Duration;

/// Retry policy for market data requests.
///
/// ## Example
///
/// ```rust
/// use scanner_feeds::RetryPolicy;
///
/// let policy = RetryPolicy::new(500, 4_000, 3).without_jitter();
/// assert_eq!(policy.calculate_delay(1), 500);
/// assert_eq!(policy.calculate_delay(2), 1_000);
/// assert!(policy.should_retry(2));
/// assert!(!policy.should_retry(3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay after the first failed attempt in milliseconds (default: 500ms)
    initial_delay_ms: u64,
    /// Maximum delay in milliseconds (default: 8_000ms)
    max_delay_ms: u64,
    /// Total attempts per request including the first (default: 3)
    max_attempts: u32,
    /// Whether to add jitter to delay (default: true)
    jitter_enabled: bool,
}

impl RetryPolicy {
    /// Create a new retry policy.
    ///
    /// # Arguments
    /// * `initial_delay_ms` - Delay after the first failure in milliseconds
    /// * `max_delay_ms` - Maximum delay cap in milliseconds
    /// * `max_attempts` - Total attempts, at least 1
    pub fn new(initial_delay_ms: u64, max_delay_ms: u64, max_attempts: u32) -> Self {
        Self {
            initial_delay_ms,
            max_delay_ms,
            max_attempts: max_attempts.max(1),
            jitter_enabled: true,
        }
    }

    /// Create a policy with jitter disabled (useful for testing).
    pub fn without_jitter(mut self) -> Self {
        self.jitter_enabled = false;
        self
    }

    /// Policy that never sleeps between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(0, 0, max_attempts).without_jitter()
    }

    pub fn initial_delay_ms(&self) -> u64 {
        self.initial_delay_ms
    }

    pub fn max_delay_ms(&self) -> u64 {
        self.max_delay_ms
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn jitter_enabled(&self) -> bool {
        self.jitter_enabled
    }

    /// Delay to wait after the given failed attempt (1-based).
    ///
    /// Doubles with each attempt and is capped at `max_delay_ms`; jitter adds
    /// up to 25% on top.
    pub fn calculate_delay(&self, attempt: u32) -> u64 {
        // 2^8 = 256x is plenty
        let backoff_power = attempt.saturating_sub(1).min(8);
        let exponential = self.initial_delay_ms.saturating_mul(1 << backoff_power);
        let capped = exponential.min(self.max_delay_ms);

        if self.jitter_enabled && capped > 0 {
            let jitter = (capped as f64 * rand::thread_rng().gen::<f64>() * 0.25) as u64;
            capped + jitter
        } else {
            capped
        }
    }

    pub fn calculate_delay_duration(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.calculate_delay(attempt))
    }

    /// Whether another attempt is allowed after `attempt` attempts have failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay_ms: 500,
            max_delay_ms: 8_000,
            max_attempts: 3,
            jitter_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_policy_default() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.initial_delay_ms(), 500);
        assert_eq!(policy.max_delay_ms(), 8_000);
        assert_eq!(policy.max_attempts(), 3);
        assert!(policy.jitter_enabled());
    }

    #[test]
    fn test_retry_policy_exponential_backoff() {
        let policy = RetryPolicy::default().without_jitter();
        assert_eq!(policy.calculate_delay(1), 500);
        assert_eq!(policy.calculate_delay(2), 1_000);
        assert_eq!(policy.calculate_delay(3), 2_000);
        assert_eq!(policy.calculate_delay(4), 4_000);
        assert_eq!(policy.calculate_delay(5), 8_000);
        assert_eq!(policy.calculate_delay(6), 8_000); // capped
    }

    #[test]
    fn test_retry_policy_jitter_bounds() {
        let policy = RetryPolicy::new(1_000, 10_000, 5);
        for _ in 0..50 {
            let delay = policy.calculate_delay(1);
            assert!((1_000..=1_250).contains(&delay));
        }
    }

    #[test]
    fn test_retry_policy_attempt_bound() {
        let policy = RetryPolicy::new(100, 1_000, 3);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_retry_policy_at_least_one_attempt() {
        let policy = RetryPolicy::new(100, 1_000, 0);
        assert_eq!(policy.max_attempts(), 1);
        assert!(!policy.should_retry(1));
    }

    #[test]
    fn test_immediate_policy_has_no_delay() {
        let policy = RetryPolicy::immediate(4);
        assert_eq!(policy.calculate_delay(3), 0);
        assert_eq!(policy.max_attempts(), 4);
    }
}
