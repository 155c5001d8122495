//! Rate Limiting Infrastructure
//!
//! A process-wide token bucket. The bucket starts full with `burst` tokens
//! and regains `per_second` tokens every second, never exceeding `burst`.
//! Each admission decision refills and deducts under a single lock
//! acquisition, so concurrent callers can neither lose a refill nor spend
//! the same token twice.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Rate limit configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitConfig {
    /// Bucket capacity (maximum burst)
    pub burst: u32,
    /// Refill rate in tokens per second
    pub per_second: f64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            burst: 10,
            per_second: 1.0,
        }
    }
}

impl RateLimitConfig {
    pub fn new(burst: u32, per_second: f64) -> Self {
        Self { burst, per_second }
    }

    /// Time needed to regain one token
    pub fn refill_interval(&self) -> Option<Duration> {
        (self.per_second > 0.0).then(|| duration_ceil(1.0 / self.per_second))
    }
}

/// Convert seconds to a `Duration`, rounding up to the next nanosecond so
/// that waiting the returned time always covers `secs`
fn duration_ceil(secs: f64) -> Duration {
    Duration::from_nanos((secs * 1e9).ceil() as u64)
}

/// Outcome of one admission decision
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimitResult {
    pub allowed: bool,
    /// Whole tokens left after this decision
    pub remaining: u32,
    /// How long until the next token, when denied
    pub retry_after: Option<Duration>,
}

#[derive(Debug)]
struct BucketState {
    tokens: f64,
    last_refill: Instant,
}

/// Thread-safe token bucket
#[derive(Debug)]
pub struct TokenBucket {
    config: RateLimitConfig,
    state: Mutex<BucketState>,
}

impl TokenBucket {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::starting_at(config, Instant::now())
    }

    /// Create a full bucket whose refill clock starts at `start`
    pub fn starting_at(config: RateLimitConfig, start: Instant) -> Self {
        let tokens = f64::from(config.burst);
        Self {
            config,
            state: Mutex::new(BucketState {
                tokens,
                last_refill: start,
            }),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Take one token if available
    pub fn allow(&self) -> bool {
        self.allow_at(Instant::now())
    }

    pub fn allow_at(&self, now: Instant) -> bool {
        self.check_at(now).allowed
    }

    /// Refill for the time elapsed up to `now`, then try to take one token
    pub fn check_at(&self, now: Instant) -> RateLimitResult {
        // The critical section cannot panic, so a poisoned lock still guards
        // a consistent state.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let capacity = f64::from(self.config.burst);
        if now > state.last_refill {
            let elapsed = now.duration_since(state.last_refill).as_secs_f64();
            state.tokens = (state.tokens + elapsed * self.config.per_second).min(capacity);
            state.last_refill = now;
        }

        if state.tokens >= 1.0 {
            state.tokens -= 1.0;
            RateLimitResult {
                allowed: true,
                remaining: state.tokens.floor() as u32,
                retry_after: None,
            }
        } else {
            let retry_after = (self.config.per_second > 0.0)
                .then(|| duration_ceil((1.0 - state.tokens) / self.config.per_second));
            RateLimitResult {
                allowed: false,
                remaining: 0,
                retry_after,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_burst_then_deny() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(RateLimitConfig::new(3, 1.0), start);

        let decisions: Vec<bool> = (0..4).map(|_| bucket.allow_at(start)).collect();
        assert_eq!(decisions, vec![true, true, true, false]);
    }

    #[test]
    fn test_one_token_per_refill_interval() {
        let start = Instant::now();
        let config = RateLimitConfig::new(5, 2.0);
        let interval = config.refill_interval().unwrap();
        let bucket = TokenBucket::starting_at(config, start);

        for _ in 0..5 {
            assert!(bucket.allow_at(start));
        }
        assert!(!bucket.allow_at(start));

        let later = start + interval;
        assert!(bucket.allow_at(later));
        assert!(!bucket.allow_at(later));
    }

    #[test]
    fn test_advertised_wait_is_always_enough() {
        for rate in [3.0, 0.3, 3000.0, 7.0] {
            let start = Instant::now();
            let config = RateLimitConfig::new(1, rate);
            let interval = config.refill_interval().unwrap();
            let bucket = TokenBucket::starting_at(config, start);

            assert!(bucket.allow_at(start));
            let retry_after = bucket.check_at(start).retry_after.unwrap();
            assert_eq!(retry_after, interval);
            assert!(bucket.allow_at(start + retry_after), "rate {rate}");
        }
    }

    #[test]
    fn test_refill_is_capped_at_burst() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(RateLimitConfig::new(2, 1.0), start);

        let much_later = start + Duration::from_secs(3600);
        assert!(bucket.allow_at(much_later));
        assert!(bucket.allow_at(much_later));
        assert!(!bucket.allow_at(much_later));
    }

    #[test]
    fn test_denied_result_reports_retry_after() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(RateLimitConfig::new(1, 1.0), start);

        assert!(bucket.check_at(start).allowed);
        let denied = bucket.check_at(start);
        assert!(!denied.allowed);
        assert_eq!(denied.remaining, 0);
        assert_eq!(denied.retry_after, Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_earlier_instant_does_not_rewind_clock() {
        let start = Instant::now();
        let later = start + Duration::from_secs(1);
        let bucket = TokenBucket::starting_at(RateLimitConfig::new(1, 1.0), later);

        assert!(bucket.allow_at(later));
        // An instant observed before the last refill must not grant tokens.
        assert!(!bucket.allow_at(start));
        assert!(bucket.allow_at(later + Duration::from_secs(1)));
    }

    #[test]
    fn test_zero_rate_never_refills() {
        let start = Instant::now();
        let bucket = TokenBucket::starting_at(RateLimitConfig::new(1, 0.0), start);

        assert!(bucket.allow_at(start));
        let denied = bucket.check_at(start + Duration::from_secs(60));
        assert!(!denied.allowed);
        assert_eq!(denied.retry_after, None);
    }

    #[test]
    fn test_concurrent_callers_never_overspend() {
        let start = Instant::now();
        let bucket = Arc::new(TokenBucket::starting_at(RateLimitConfig::new(50, 0.0), start));
        let granted = Arc::new(AtomicU32::new(0));

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let bucket = Arc::clone(&bucket);
                let granted = Arc::clone(&granted);
                scope.spawn(move || {
                    for _ in 0..25 {
                        if bucket.allow_at(start) {
                            granted.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                });
            }
        });

        assert_eq!(granted.load(Ordering::Relaxed), 50);
    }
}
