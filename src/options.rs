use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::retry::RetryPolicy;

/// Per-call overrides of the method defaults.
///
/// ```
/// use std::time::Duration;
/// use video_stitcher::{CallOptions, RetryPolicy};
///
/// let options = CallOptions::new()
///     .timeout(Duration::from_secs(10))
///     .retry(RetryPolicy::none())
///     .header("x-request-reason", "nightly-sync");
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub(crate) timeout: Option<Duration>,
    pub(crate) retry: Option<RetryPolicy>,
    pub(crate) metadata: Vec<(String, String)>,
    pub(crate) cancellation: Option<CancellationToken>,
}

impl CallOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overall deadline for the call, retries included.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Extra request metadata, sent as headers.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.push((key.into(), value.into()));
        self
    }

    /// Abandon the call, and any pending retry, once `token` is cancelled.
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }
}

/// What a transport sees for a single attempt.
#[derive(Debug, Clone)]
pub struct CallContext {
    /// Absolute deadline of the whole call.
    pub deadline: Option<Instant>,
    /// The timeout the deadline was derived from, for error reporting.
    pub timeout: Option<Duration>,
    pub cancellation: CancellationToken,
    pub metadata: Arc<Vec<(String, String)>>,
}

impl CallContext {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            deadline: timeout.map(|t| Instant::now() + t),
            timeout,
            cancellation: CancellationToken::new(),
            metadata: Arc::new(Vec::new()),
        }
    }

    /// Time left before the deadline; `None` when there is no deadline.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self::new(None)
    }
}
