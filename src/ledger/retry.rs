use std::time::Duration;

use async_trait::async_trait;

use crate::{address::Address, error::LookupError};

use super::BalanceLookup;

/// Bounded exponential backoff. Only transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// `retries` extra attempts after the first, starting at 500ms and doubling up to 8s.
    pub fn with_retries(retries: u32) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }

    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// Wraps a lookup with a [`RetryPolicy`].
#[derive(Debug, Clone)]
pub struct Retrying<L> {
    inner: L,
    policy: RetryPolicy,
}

impl<L> Retrying<L> {
    pub fn new(inner: L, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

#[async_trait]
impl<L: BalanceLookup> BalanceLookup for Retrying<L> {
    async fn lookup(&self, address: &Address) -> Result<u64, LookupError> {
        let mut attempt = 1;
        loop {
            match self.inner.lookup(address).await {
                Err(e) if e.is_transient() && attempt < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        address = %address,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Lookup failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails with the given error for the first `failures` calls, then answers 42.
    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        error: LookupError,
    }

    #[async_trait]
    impl BalanceLookup for Flaky {
        async fn lookup(&self, _address: &Address) -> Result<u64, LookupError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(self.error.clone())
            } else {
                Ok(42)
            }
        }
    }

    fn flaky(failures: u32, error: LookupError) -> Arc<Flaky> {
        Arc::new(Flaky { calls: AtomicU32::new(0), failures, error })
    }

    fn fast(retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts: retries + 1,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    fn address() -> Address {
        crate::ledger::esplora::tests::address(
            "0204664c60ceabd82967055ccbd0f56a1585dfbd42032656efa501c463b16fbdfe",
        )
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::with_retries(10);
        assert_eq!(policy.max_attempts, 11);
        assert_eq!(policy.delay_for(1), Duration::from_millis(500));
        assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(5), Duration::from_secs(8));
        assert_eq!(policy.delay_for(40), Duration::from_secs(8));
        assert_eq!(RetryPolicy::default(), RetryPolicy::none());
    }

    #[tokio::test]
    async fn retries_transient_errors() {
        let inner = flaky(2, LookupError::Status { status: 503, body: String::new() });
        let lookup = Retrying::new(inner.clone(), fast(3));

        assert_eq!(lookup.lookup(&address()).await, Ok(42));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let inner = flaky(10, LookupError::Transport("refused".into()));
        let lookup = Retrying::new(inner.clone(), fast(2));

        assert_eq!(lookup.lookup(&address()).await, Err(LookupError::Transport("refused".into())));
        assert_eq!(inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let inner = flaky(10, LookupError::Status { status: 400, body: "bad address".into() });
        let lookup = Retrying::new(inner.clone(), fast(5));

        assert!(lookup.lookup(&address()).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn default_policy_makes_one_attempt() {
        let inner = flaky(1, LookupError::Transport("timed out".into()));
        let lookup = Retrying::new(inner.clone(), RetryPolicy::default());

        assert!(lookup.lookup(&address()).await.is_err());
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
    }
}
