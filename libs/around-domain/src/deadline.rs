//! Optional deadlines around adapter calls
//!
//! Backing-store calls are unbounded unless a limit is configured. When one
//! is, the call is abandoned once the limit elapses.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// An adapter call did not complete within its configured limit
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} did not complete within {}ms", .limit.as_millis())]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Await `fut`, bounded by `limit` when one is set
pub(crate) async fn within<F>(
    limit: Option<Duration>,
    operation: &'static str,
    fut: F,
) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    match limit {
        Some(limit) => tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| DeadlineExceeded { operation, limit }),
        None => Ok(fut.await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unbounded_call_completes() {
        let result = within(None, "noop", async { 7 }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_call_times_out() {
        let result = within(Some(Duration::from_millis(50)), "slow upload", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.operation, "slow upload");
        assert_eq!(err.to_string(), "slow upload did not complete within 50ms");
    }
}
