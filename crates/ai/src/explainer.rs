use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::request::{ExplanationRequest, InsightRequest};
use crate::result::{AiError, Explanation};

/// Produces a natural-language rationale for a decision that has already
/// been made and committed.
#[async_trait]
pub trait Explainer: Send + Sync + 'static {
    async fn explain(&self, request: &ExplanationRequest) -> Result<Explanation, AiError>;

    /// One-sentence insight over a day of operations. Explainers without a
    /// model behind them report `NotConfigured`.
    async fn insight(&self, request: &InsightRequest) -> Result<Explanation, AiError> {
        let _ = request;
        Err(AiError::NotConfigured)
    }
}

#[async_trait]
impl<E> Explainer for Arc<E>
where
    E: Explainer + ?Sized,
{
    async fn explain(&self, request: &ExplanationRequest) -> Result<Explanation, AiError> {
        (**self).explain(request).await
    }

    async fn insight(&self, request: &InsightRequest) -> Result<Explanation, AiError> {
        (**self).insight(request).await
    }
}

/// Used when no credentials are configured: every call fails with
/// `NotConfigured`, so decisions go out without an explanation.
#[derive(Debug, Copy, Clone, Default)]
pub struct DisabledExplainer;

#[async_trait]
impl Explainer for DisabledExplainer {
    async fn explain(&self, _request: &ExplanationRequest) -> Result<Explanation, AiError> {
        Err(AiError::NotConfigured)
    }
}

/// Retry policy for outbound explanation calls.
///
/// The default makes exactly one attempt.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }

    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self { max_retries, backoff }
    }

    /// Run `call` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. Returns the value and the number of attempts.
    pub async fn run<F, Fut, T>(&self, mut call: F) -> Result<(T, u32), AiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AiError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match call().await {
                Ok(value) => return Ok((value, attempt)),
                Err(e) if e.is_retryable() && attempt <= self.max_retries => {
                    tracing::warn!(attempt, error = %e, "explanation call failed; retrying");
                    if !self.backoff.is_zero() {
                        tokio::time::sleep(self.backoff).await;
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::Decision;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn disabled_explainer_always_fails() {
        let req = ExplanationRequest::new(Decision::Reject, "widget", 1);
        let err = DisabledExplainer.explain(&req).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));

        let err = DisabledExplainer.insight(&InsightRequest::new("2024-03-04")).await.unwrap_err();
        assert!(matches!(err, AiError::NotConfigured));
    }

    #[tokio::test]
    async fn default_policy_makes_one_attempt() {
        let calls = AtomicU32::new(0);
        let res: Result<((), u32), AiError> = RetryPolicy::default()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AiError::Transport("connection reset".into())) }
            })
            .await;
        assert!(res.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_transient_failures_within_budget() {
        let calls = AtomicU32::new(0);
        let (value, attempts) = RetryPolicy::new(2, Duration::ZERO)
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(AiError::Upstream { status: 503, body: "busy".into() })
                    } else {
                        Ok("done")
                    }
                }
            })
            .await
            .unwrap();
        assert_eq!(value, "done");
        assert_eq!(attempts, 3);
    }

    #[tokio::test]
    async fn permanent_failures_are_not_retried() {
        let calls = AtomicU32::new(0);
        let res: Result<((), u32), AiError> = RetryPolicy::new(5, Duration::ZERO)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(AiError::Upstream { status: 401, body: "bad key".into() }) }
            })
            .await;
        assert!(matches!(res, Err(AiError::Upstream { status: 401, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
