//! Resubmission of echo transactions with exponential backoff.
//!
//! The program never retries. A transaction it rejected is returned to the
//! caller on the first attempt; only transport failures and confirmation
//! timeouts are resubmitted here.

use std::future::Future;
use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;
use crate::errors::EchoClientError;

#[derive(Debug, Clone)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Single attempt, no backoff.
    pub fn no_retry() -> Self {
        Self::new(RetryConfig::none())
    }

    /// Delay before retry number `retry` (1-based), without jitter.
    pub fn backoff_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1) as i32;
        let millis = self.config.initial_delay_ms as f64 * self.config.backoff_multiplier.powi(exponent);
        Duration::from_millis((millis as u64).min(self.config.max_delay_ms))
    }

    /// Runs `operation` until it succeeds, fails with an error that is not
    /// retryable, or has been retried `max_retries` times. `label` names the
    /// operation in log events.
    pub async fn execute<F, Fut, T>(&self, label: &str, operation: F) -> Result<T, EchoClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, EchoClientError>>,
    {
        self.execute_with_recovery(label, operation, || async { Ok(None) }).await
    }

    /// Like [`execute`](Self::execute), but after every retryable failure
    /// `recover` is asked whether the failed attempt took effect anyway.
    ///
    /// `recover` returns `Ok(Some(value))` when it did, `Ok(None)` when the
    /// operation should be resubmitted, and an error that is not retryable
    /// when the attempt landed and failed. Retryable lookup errors are logged
    /// and the operation is resubmitted.
    pub async fn execute_with_recovery<F, Fut, R, RFut, T>(
        &self,
        label: &str,
        operation: F,
        recover: R,
    ) -> Result<T, EchoClientError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, EchoClientError>>,
        R: Fn() -> RFut,
        RFut: Future<Output = Result<Option<T>, EchoClientError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };

            tracing::warn!(
                operation = label,
                attempt = retry + 1,
                max_retries = self.max_retries(),
                category = %err.category(),
                error = %err,
                "Echo operation failed"
            );
            if !err.is_retryable() {
                return Err(err);
            }

            match recover().await {
                Ok(Some(value)) => {
                    tracing::info!(operation = label, attempt = retry + 1, "Attempt landed after failure report");
                    return Ok(value);
                }
                Ok(None) => {}
                Err(status_err) if status_err.is_retryable() => {
                    tracing::debug!(operation = label, error = %status_err, "Status lookup failed");
                }
                Err(status_err) => return Err(status_err),
            }

            if retry >= self.max_retries() {
                return Err(err);
            }
            retry += 1;

            let mut delay = self.backoff_delay(retry);
            if let Some(hint) = err.retry_hint_ms() {
                delay = delay.max(Duration::from_millis(hint.min(self.config.max_delay_ms)));
            }
            let delay = delay + self.jitter(delay);

            tracing::debug!(operation = label, retry, delay_ms = delay.as_millis() as u64, "Resubmitting");
            tokio::time::sleep(delay).await;
        }
    }

    /// Up to a quarter of `delay`, so concurrent clients spread out.
    fn jitter(&self, delay: Duration) -> Duration {
        let max = delay.as_millis() as u64 / 4;
        if max == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max))
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.config.confirmation_timeout_ms)
    }

    pub fn max_retries(&self) -> u32 {
        self.config.max_retries
    }
}
