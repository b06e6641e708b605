//! Retry policy for transient failures.
//!
//! Delay for attempt `k` is `base_delay * 2^k` plus random jitter drawn
//! from `[0, jitter)`, capped at `max_delay`. The attempt count is bounded
//! by `max_retries`; the policy itself never sleeps.

use rand::Rng;
use std::time::Duration;

use crate::error::ApiError;

/// Hard cap on a single computed delay.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

// ============================================================================
// Retry Decision
// ============================================================================

/// Outcome of consulting the policy after a failed attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryDecision {
    /// Whether the call should be re-attempted.
    pub should_retry: bool,
    /// How long to wait before the next attempt. Zero when not retrying.
    pub delay: Duration,
}

impl RetryDecision {
    fn no() -> Self {
        Self {
            should_retry: false,
            delay: Duration::ZERO,
        }
    }
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Policy for retrying failed requests.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: u32,
    /// Base delay; doubled per attempt.
    pub base_delay: Duration,
    /// Upper bound (exclusive) of the random jitter added to each delay.
    pub jitter: Duration,
    /// Hard cap on the computed delay to prevent unbounded growth.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Creates a policy with the given retry bound and default timing.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_millis(1000),
            jitter: Duration::from_millis(1000),
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0)
    }

    /// Sets the base delay.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Sets the jitter bound. Zero disables jitter.
    pub fn with_jitter(mut self, jitter: Duration) -> Self {
        self.jitter = jitter;
        self
    }

    /// Sets the delay cap.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Computes the backoff delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        // 2^attempt with a checked shift so large attempts saturate
        // instead of overflowing.
        let multiplier = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        let exp_delay = self
            .base_delay
            .checked_mul(multiplier)
            .unwrap_or(self.max_delay);
        let capped = exp_delay.min(self.max_delay);

        let jitter_ms = u64::try_from(self.jitter.as_millis()).unwrap_or(u64::MAX);
        if jitter_ms == 0 {
            return capped;
        }

        let jitter = Duration::from_millis(rand::rng().random_range(0..jitter_ms));
        (capped + jitter).min(self.max_delay)
    }

    /// Decides whether a failed attempt should be retried.
    ///
    /// Rules, in order: the attempt bound wins; cancellations and
    /// non-transient errors are never retried; everything transient
    /// (network failure, 5xx, 429, 408) is retried with backoff.
    pub fn decide(&self, attempt: u32, error: &ApiError) -> RetryDecision {
        if attempt >= self.max_retries {
            return RetryDecision::no();
        }

        if !error.is_transient() {
            return RetryDecision::no();
        }

        RetryDecision {
            should_retry: true,
            delay: self.delay_for_attempt(attempt),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{classify_status, classify_transport};
    use crate::request::Payload;
    use crate::transport::TransportError;

    fn policy() -> RetryPolicy {
        RetryPolicy::default()
    }

    #[test]
    fn test_never_retries_at_bound() {
        let transient = classify_status(503, &Payload::Empty);

        assert!(policy().decide(2, &transient).should_retry);
        assert!(!policy().decide(3, &transient).should_retry);
        assert!(!policy().decide(4, &transient).should_retry);
        assert!(!RetryPolicy::no_retry().decide(0, &transient).should_retry);
    }

    #[test]
    fn test_403_not_retried_503_retried() {
        let forbidden = classify_status(403, &Payload::Empty);
        let unavailable = classify_status(503, &Payload::Empty);

        for attempt in 0..3 {
            assert!(!policy().decide(attempt, &forbidden).should_retry);
            assert!(policy().decide(attempt, &unavailable).should_retry);
        }
    }

    #[test]
    fn test_rate_limit_timeout_and_network_retried() {
        let rate_limited = classify_status(429, &Payload::Empty);
        let timeout = classify_status(408, &Payload::Empty);
        let network = classify_transport(&TransportError::Timeout);

        assert!(policy().decide(0, &rate_limited).should_retry);
        assert!(policy().decide(0, &timeout).should_retry);
        assert!(policy().decide(0, &network).should_retry);
    }

    #[test]
    fn test_cancellation_never_retried() {
        assert!(!policy().decide(0, &ApiError::Cancelled).should_retry);
        assert!(!policy().decide(0, &ApiError::AuthExpired).should_retry);
    }

    #[test]
    fn test_delay_window_per_attempt() {
        let policy = policy();

        for attempt in 0..3u32 {
            let floor = Duration::from_millis(1000 * 2u64.pow(attempt));
            let ceiling = floor + Duration::from_millis(1000);

            // Jitter is random; sample the window a number of times.
            for _ in 0..50 {
                let delay = policy.delay_for_attempt(attempt);
                assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
                assert!(delay < ceiling, "attempt {attempt}: {delay:?} >= {ceiling:?}");
            }
        }
    }

    #[test]
    fn test_delay_without_jitter_is_exact() {
        let policy = RetryPolicy::new(3).with_jitter(Duration::ZERO);

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_delay_cap() {
        let policy = RetryPolicy::new(10)
            .with_jitter(Duration::ZERO)
            .with_max_delay(Duration::from_secs(30));

        // 1000ms * 2^10 = ~17 minutes uncapped
        assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
        // Saturating shift for absurd attempt numbers
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(30));
    }
}
