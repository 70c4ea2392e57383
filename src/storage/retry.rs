//! Retry policy for record store calls.
//!
//! Only transient failures ([`StoreError::is_transient`]) are retried. The
//! delay before each retry is the server-supplied `Retry-After` when there is
//! one, otherwise an exponential backoff capped at `max_delay`.

use super::{RecordStore, StoreError, StoreResult};
use crate::account::{AttributeBag, RawEntitlement, RawRecord};
use chrono::{DateTime, Utc};
use log::{debug, warn};
use std::future::Future;
use std::time::Duration;

/// Default number of retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Bounded exponential backoff honoring server hints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Unit of the exponential backoff
    pub base_delay: Duration,
    /// Upper bound for computed (not server-supplied) delays
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay before retry number `retry` (1-based) after `error`.
    pub fn delay_for(&self, retry: u32, error: &StoreError) -> Duration {
        if let Some(hint) = error.retry_after() {
            return hint;
        }

        let factor = 2u32.saturating_pow(retry);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Run `call` until it succeeds, fails permanently, or retries run out.
    pub async fn run<T, F, Fut>(&self, operation: &str, mut call: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = StoreResult<T>>,
    {
        let mut retry = 0;
        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(error) if error.is_transient() && retry < self.max_retries => {
                    retry += 1;
                    let delay = self.delay_for(retry, &error);
                    warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        operation, error, retry, self.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(error) => {
                    if retry > 0 {
                        debug!("{} giving up after {} retries", operation, retry);
                    }
                    return Err(error);
                }
            }
        }
    }
}

/// Parse a `Retry-After` header value: delta-seconds or an HTTP-date.
///
/// Transport implementations of [`RecordStore`] use this to fill the hint of
/// [`StoreError::RateLimited`] and [`StoreError::Unavailable`] from a 429 or
/// 503 response. Dates in the past yield a zero delay.
pub fn parse_retry_after(header: &str, now: DateTime<Utc>) -> Option<Duration> {
    let header = header.trim();
    if let Ok(seconds) = header.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(header).ok()?.with_timezone(&Utc);
    Some((at - now).to_std().unwrap_or(Duration::ZERO))
}

/// Record store wrapper applying a [`RetryPolicy`] to every call.
#[derive(Debug, Clone)]
pub struct RetryingRecordStore<S: RecordStore> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: RecordStore> RetryingRecordStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

impl<S: RecordStore> RecordStore for RetryingRecordStore<S> {
    async fn list_accounts(&self) -> StoreResult<Vec<RawRecord>> {
        self.policy
            .run("list_accounts", || self.inner.list_accounts())
            .await
    }

    async fn fetch_account(&self, identity: &str) -> StoreResult<Option<RawRecord>> {
        self.policy
            .run("fetch_account", || self.inner.fetch_account(identity))
            .await
    }

    async fn write_account(&self, identity: &str, attributes: AttributeBag) -> StoreResult<RawRecord> {
        self.policy
            .run("write_account", || {
                self.inner.write_account(identity, attributes.clone())
            })
            .await
    }

    async fn create_account(&self, attributes: AttributeBag) -> StoreResult<RawRecord> {
        self.policy
            .run("create_account", || self.inner.create_account(attributes.clone()))
            .await
    }

    async fn set_disabled(
        &self,
        identity: &str,
        status_attribute: &str,
        disabled: bool,
    ) -> StoreResult<RawRecord> {
        self.policy
            .run("set_disabled", || {
                self.inner.set_disabled(identity, status_attribute, disabled)
            })
            .await
    }

    async fn list_entitlements(&self) -> StoreResult<Vec<RawEntitlement>> {
        self.policy
            .run("list_entitlements", || self.inner.list_entitlements())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::default()
            .with_base_delay(Duration::from_millis(1))
            .with_max_delay(Duration::from_millis(5))
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let policy = RetryPolicy::default();
        let error = StoreError::unavailable("503");

        assert_eq!(policy.delay_for(1, &error), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2, &error), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3, &error), Duration::from_millis(800));
        assert_eq!(policy.delay_for(20, &error), Duration::from_secs(30));
        assert_eq!(policy.delay_for(u32::MAX, &error), Duration::from_secs(30));
    }

    #[test]
    fn test_retry_after_overrides_backoff() {
        let policy = RetryPolicy::default();
        let error = StoreError::rate_limited(Some(Duration::from_secs(90)));
        assert_eq!(policy.delay_for(1, &error), Duration::from_secs(90));
    }

    #[test]
    fn test_parse_retry_after() {
        let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap();

        assert_eq!(parse_retry_after("120", now), Some(Duration::from_secs(120)));
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:28:30 GMT", now),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            parse_retry_after("Wed, 21 Oct 2015 07:00:00 +0000", now),
            Some(Duration::ZERO)
        );
        assert_eq!(parse_retry_after("soon", now), None);
    }

    #[tokio::test]
    async fn test_run_retries_transient_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result = fast_policy()
            .run("flaky", || {
                let counter = counter.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(StoreError::rate_limited(None))
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_does_not_retry_permanent_failures() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: StoreResult<()> = fast_policy()
            .run("missing", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(StoreError::not_found("jdoe"))
                }
            })
            .await;

        assert_eq!(result, Err(StoreError::not_found("jdoe")));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_retries() {
        let attempts = Arc::new(AtomicU32::new(0));
        let counter = attempts.clone();

        let result: StoreResult<()> = fast_policy()
            .with_max_retries(3)
            .run("down", || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(StoreError::unavailable("503"))
                }
            })
            .await;

        assert!(matches!(result, Err(StoreError::Unavailable { .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 4);
    }
}
