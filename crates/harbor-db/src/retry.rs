//! Bounded retry with a fixed delay between attempts.

use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    delay: Duration,
}

/// Why a retried operation finally failed.
#[derive(Debug, thiserror::Error)]
pub enum RetryError<E>
where
    E: std::error::Error + 'static,
{
    /// Every attempt failed with a retryable error.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: E,
    },

    /// The error was not worth retrying.
    #[error(transparent)]
    Permanent(E),
}

impl<E> RetryError<E>
where
    E: std::error::Error + 'static,
{
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Exhausted { source, .. } => source,
            RetryError::Permanent(source) => source,
        }
    }

    pub fn attempts(&self) -> Option<u32> {
        match self {
            RetryError::Exhausted { attempts, .. } => Some(*attempts),
            RetryError::Permanent(_) => None,
        }
    }
}

impl RetryPolicy {
    /// At least one attempt is always made.
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            delay,
        }
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds, fails with an error `retryable` rejects, or
    /// the attempt budget is spent.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        operation: &'static str,
        mut op: F,
        retryable: P,
    ) -> Result<T, RetryError<E>>
    where
        E: std::error::Error + 'static,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!(operation, attempt, "Succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) if !retryable(&e) => return Err(RetryError::Permanent(e)),
                Err(e) if attempt >= self.attempts => {
                    tracing::error!(
                        operation,
                        attempts = attempt,
                        error = %e,
                        "Giving up after retries"
                    );
                    return Err(RetryError::Exhausted {
                        operation,
                        attempts: attempt,
                        source: e,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        operation,
                        attempt,
                        max_attempts = self.attempts,
                        retry_in_ms = self.delay.as_millis() as u64,
                        error = %e,
                        "Attempt failed, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, thiserror::Error)]
    enum TestError {
        #[error("transient")]
        Transient,
        #[error("fatal")]
        Fatal,
    }

    fn is_transient(e: &TestError) -> bool {
        matches!(e, TestError::Transient)
    }

    #[tokio::test]
    async fn test_succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result = policy
            .run(
                "flaky",
                move || async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(TestError::Transient)
                    } else {
                        Ok(42)
                    }
                },
                is_transient,
            )
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_budget() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(3, Duration::ZERO);

        let result: Result<(), _> = policy
            .run(
                "down",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Transient)
                },
                is_transient,
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts(), Some(3));
        assert!(matches!(err.into_inner(), TestError::Transient));
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let policy = RetryPolicy::new(5, Duration::ZERO);

        let result: Result<(), _> = policy
            .run(
                "broken",
                move || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(TestError::Fatal)
                },
                is_transient,
            )
            .await;

        assert!(matches!(result, Err(RetryError::Permanent(TestError::Fatal))));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_at_least_one_attempt() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).attempts(), 1);
        assert_eq!(RetryPolicy::none().attempts(), 1);
    }
}
