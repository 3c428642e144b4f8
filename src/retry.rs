//! Retry and timeout policy.
//!
//! Every RPC is run through [`CallSettings::invoke`], which takes the raw
//! transport call and returns the same `Result<T>`. Between the two it
//! enforces the call deadline, honours cancellation and re-issues the call
//! after a backoff when the failure is retryable.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{Result, StitcherError};
use crate::options::{CallContext, CallOptions};
use crate::transport::Method;

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Backoff schedule and retry predicate.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Growth factor applied to the delay after each retry.
    pub multiplier: f64,
    /// Upper bound for a single delay.
    pub max_delay: Duration,
    /// Stop retrying once this much time has passed since the first attempt.
    pub max_elapsed: Option<Duration>,
    /// Total attempts, the first one included. `None` means unbounded.
    pub max_attempts: Option<u32>,
    /// Decides whether a failure is worth another attempt.
    pub retryable: fn(&StitcherError) -> bool,
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_attempts: Some(1),
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_elapsed(mut self, elapsed: Duration) -> Self {
        self.max_elapsed = Some(elapsed);
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Delay to wait after the `attempt`-th failed attempt (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent);
        if secs <= 0.0 {
            Duration::ZERO
        } else if !secs.is_finite() || secs >= self.max_delay.as_secs_f64() {
            self.max_delay
        } else {
            Duration::from_secs_f64(secs)
        }
    }
}

impl Default for RetryPolicy {
    /// 1s, 2s, 4s, ... capped at 32s, four attempts in total.
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(32),
            max_elapsed: None,
            max_attempts: Some(4),
            retryable: StitcherError::is_retryable,
        }
    }
}

/// Defaults applied to one method.
#[derive(Debug, Clone)]
pub struct MethodConfig {
    pub timeout: Duration,
    /// `None` disables retries for the method.
    pub retry: Option<RetryPolicy>,
}

impl Default for MethodConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: Some(RetryPolicy::default()),
        }
    }
}

/// Method defaults merged with the caller's [`CallOptions`].
#[derive(Debug, Clone)]
pub(crate) struct CallSettings {
    pub method: Method,
    pub timeout: Option<Duration>,
    pub retry: RetryPolicy,
    pub metadata: Arc<Vec<(String, String)>>,
    pub cancellation: CancellationToken,
}

impl CallSettings {
    pub fn resolve(method: Method, config: &MethodConfig, options: Option<CallOptions>) -> Self {
        let options = options.unwrap_or_default();
        Self {
            method,
            timeout: Some(options.timeout.unwrap_or(config.timeout)),
            retry: options
                .retry
                .or_else(|| config.retry.clone())
                .unwrap_or_else(RetryPolicy::none),
            metadata: Arc::new(options.metadata),
            cancellation: options.cancellation.unwrap_or_default(),
        }
    }

    /// A fresh context whose deadline starts now.
    pub fn context(&self) -> CallContext {
        CallContext {
            deadline: self.timeout.map(|t| Instant::now() + t),
            timeout: self.timeout,
            cancellation: self.cancellation.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Run `op` under this call's deadline, cancellation and retry policy.
    pub async fn invoke<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnMut(CallContext) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        invoke(self.method, &self.retry, self.context(), op).await
    }
}

/// Retry loop shared by every RPC.
///
/// A failure is surfaced as-is when it is not retryable, or when another
/// attempt would exceed `max_attempts`, `max_elapsed` or the call deadline.
/// An attempt cut short by the deadline fails with
/// [`StitcherError::Timeout`]; a cancelled call fails with
/// [`StitcherError::Cancelled`].
pub(crate) async fn invoke<T, F, Fut>(
    method: Method,
    policy: &RetryPolicy,
    ctx: CallContext,
    mut op: F,
) -> Result<T>
where
    F: FnMut(CallContext) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        if ctx.cancellation.is_cancelled() {
            return Err(StitcherError::Cancelled);
        }

        debug!(%method, attempt, "sending request");
        let err = match run_attempt(&ctx, op(ctx.clone())).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !(policy.retryable)(&err) {
            return Err(err);
        }
        if policy.max_attempts.is_some_and(|max| attempt >= max) {
            debug!(%method, attempt, "retry attempts exhausted");
            return Err(err);
        }

        let delay = policy.delay_for(attempt);
        if policy
            .max_elapsed
            .is_some_and(|max| started.elapsed() + delay > max)
        {
            debug!(%method, attempt, "retry time budget exhausted");
            return Err(err);
        }
        if ctx.deadline.is_some_and(|deadline| Instant::now() + delay >= deadline) {
            debug!(%method, attempt, "no time left for another attempt");
            return Err(err);
        }

        warn!(%method, attempt, delay_ms = delay.as_millis() as u64, error = %err, "retrying");
        tokio::select! {
            _ = ctx.cancellation.cancelled() => return Err(StitcherError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn run_attempt<T, Fut>(ctx: &CallContext, attempt: Fut) -> Result<T>
where
    Fut: Future<Output = Result<T>>,
{
    let bounded = async {
        match ctx.deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, attempt)
                .await
                .map_err(|_| StitcherError::Timeout(ctx.timeout.unwrap_or_default()))?,
            None => attempt.await,
        }
    };

    tokio::select! {
        biased;
        _ = ctx.cancellation.cancelled() => Err(StitcherError::Cancelled),
        result = bounded => result,
    }
}
