//! Exponential backoff retry loop.
//!
//! Every call owns its retry budget and current delay. Nothing is shared between concurrent
//! calls, and a sequence runs until it succeeds or the budget is spent.

use std::{fmt::Display, future::Future, time::Duration};
use tokio::time::sleep;
use tracing::debug;

pub const DEFAULT_RETRIES: u32 = 2;
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(300);

pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub struct RetryPolicy {
    /// Attempts made after the first one, so a call runs at most `retries + 1` times.
    pub retries: u32,
    /// Delay before the first retry. Doubles for every retry after it.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(retries: u32, backoff: Duration) -> Self {
        Self { retries, backoff }
    }

    #[must_use]
    pub fn without_retries(self) -> Self {
        Self { retries: 0, ..self }
    }

    /// Delay before retry number `retry`, counted from zero.
    #[must_use]
    pub fn delay(self, retry: u32) -> Duration {
        backoff_delay(self.backoff, retry)
    }
}

/// `initial * 2^retry`, saturating at [`Duration::MAX`].
#[must_use]
pub fn backoff_delay(initial: Duration, retry: u32) -> Duration {
    2_u32
        .checked_pow(retry)
        .map_or(Duration::MAX, |factor| initial.saturating_mul(factor))
}

/// Runs `attempt` until it succeeds, fails with an error that isn't retryable, or the policy's
/// budget is exhausted. The error of the last attempt is returned unchanged.
pub async fn retry<T, E, F, Fut>(policy: RetryPolicy, mut attempt: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    let mut retries_done = 0;

    loop {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if retries_done < policy.retries && err.is_retryable() => {
                let delay = policy.delay(retries_done);
                debug!(
                    attempt = retries_done + 1,
                    remaining = policy.retries - retries_done,
                    ?delay,
                    error = %err,
                    "Attempt failed, retrying"
                );

                sleep(delay).await;
                retries_done += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::retry::{RetryPolicy, Retryable, backoff_delay, retry};
    use std::{
        cell::{Cell, RefCell},
        time::Duration,
    };
    use thiserror::Error;
    use tokio::time::Instant;

    #[derive(Copy, Clone, Eq, PartialEq, Debug, Error)]
    enum TestError {
        #[error("transient")]
        Transient,
        #[error("fatal")]
        Fatal,
    }

    impl Retryable for TestError {
        fn is_retryable(&self) -> bool {
            *self == TestError::Transient
        }
    }

    fn millis(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn delays_double() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay(0), millis(300));
        assert_eq!(policy.delay(1), millis(600));
        assert_eq!(policy.delay(2), millis(1200));
        assert_eq!(backoff_delay(millis(1), 40), Duration::MAX);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausts_budget_with_exponential_waits() {
        let start = Instant::now();
        let started_at = RefCell::new(Vec::new());
        let started_at_ref = &started_at;

        let result: Result<(), _> = retry(RetryPolicy::default(), move || async move {
            started_at_ref.borrow_mut().push(start.elapsed().as_millis());
            Err(TestError::Transient)
        })
        .await;

        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(started_at.into_inner(), [0, 300, 900]);
    }

    #[tokio::test(start_paused = true)]
    async fn succeeds_once_reachable() {
        let attempts = Cell::new(0);
        let attempts_ref = &attempts;

        let result = retry(RetryPolicy::new(3, millis(10)), move || async move {
            attempts_ref.set(attempts_ref.get() + 1);
            if attempts_ref.get() < 3 {
                Err(TestError::Transient)
            } else {
                Ok("reachable")
            }
        })
        .await;

        assert_eq!(result, Ok("reachable"));
        assert_eq!(attempts.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_errors_are_not_retried() {
        let start = Instant::now();
        let attempts = Cell::new(0);
        let attempts_ref = &attempts;

        let result: Result<(), _> = retry(RetryPolicy::default(), move || async move {
            attempts_ref.set(attempts_ref.get() + 1);
            Err(TestError::Fatal)
        })
        .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(attempts.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_budget_runs_once() {
        let attempts = Cell::new(0);
        let attempts_ref = &attempts;

        let result: Result<(), _> = retry(
            RetryPolicy::default().without_retries(),
            move || async move {
                attempts_ref.set(attempts_ref.get() + 1);
                Err(TestError::Transient)
            },
        )
        .await;

        assert_eq!(result, Err(TestError::Transient));
        assert_eq!(attempts.get(), 1);
    }
}
