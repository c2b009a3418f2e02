use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::ReportError;

/// Bounded retry with a fixed delay between attempts.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
        }
    }
}

/// Runs `attempt` up to `policy.max_attempts` times.
///
/// An error for which `is_fatal` returns true propagates immediately without
/// further attempts. Otherwise the last error propagates once attempts are
/// exhausted. The inter-attempt delay is a plain sequential sleep; nothing
/// runs concurrently.
pub async fn retry<T, F, Fut, P>(
    policy: &RetryPolicy,
    is_fatal: P,
    mut attempt: F,
) -> Result<T, ReportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ReportError>>,
    P: Fn(&ReportError) -> bool,
{
    let max_attempts = policy.max_attempts.max(1);

    let mut attempt_no = 0;
    loop {
        attempt_no += 1;
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if is_fatal(&err) || attempt_no >= max_attempts => return Err(err),
            Err(err) => {
                warn!(
                    attempt = attempt_no,
                    max_attempts,
                    error = %err,
                    "Attempt failed, retrying after delay"
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
