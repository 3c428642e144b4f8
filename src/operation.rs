//! Long-running operations.
//!
//! Mutating methods (create/update/delete of CDN keys, slates and live
//! configs) return an [`OperationHandle`] instead of the resource. The
//! handle is refreshed by name until the server reports it done:
//!
//! ```text
//! Pending -> Running* -> { Succeeded | Failed }
//! ```

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{Result, Status, StitcherError};
use crate::models::{CancelOperationRequest, GetOperationRequest};
use crate::retry::CallSettings;
use crate::transport::VideoStitcherTransport;

/// The empty message, returned by deletes and cancellation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Metadata attached to stitcher operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    /// RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    /// RFC 3339.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Resource the operation acts on.
    #[serde(default)]
    pub target: String,
    /// e.g. `"create"`.
    #[serde(default)]
    pub verb: String,
}

/// A server-side asynchronous task as reported by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "OperationRepr", into = "OperationRepr")]
pub struct Operation {
    /// `projects/{project}/locations/{location}/operations/{id}`.
    pub name: String,
    pub metadata: Option<OperationMetadata>,
    pub done: bool,
    /// Set once `done` is true.
    pub result: Option<OperationResult>,
}

/// The `result` oneof of an [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Error(Status),
    /// The packed response, including its `@type`.
    Response(serde_json::Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    /// Accepted, no progress reported yet.
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl Operation {
    pub fn state(&self) -> OperationState {
        match (&self.result, self.done) {
            (Some(OperationResult::Error(_)), true) => OperationState::Failed,
            (_, true) => OperationState::Succeeded,
            (_, false) if self.metadata.is_some() => OperationState::Running,
            _ => OperationState::Pending,
        }
    }

    /// Decode the terminal result, or `None` while still in flight.
    pub fn decode<T: DeserializeOwned>(&self) -> Option<Result<T>> {
        if !self.done {
            return None;
        }
        let decoded = match &self.result {
            Some(OperationResult::Error(status)) => Err(StitcherError::OperationFailed {
                name: self.name.clone(),
                status: status.clone(),
            }),
            Some(OperationResult::Response(value)) => {
                serde_json::from_value(value.clone()).map_err(StitcherError::from)
            }
            None => serde_json::from_value(serde_json::Value::Object(Default::default()))
                .map_err(StitcherError::from),
        };
        Some(decoded)
    }
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OperationRepr {
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    metadata: Option<OperationMetadata>,
    #[serde(default)]
    done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    response: Option<serde_json::Value>,
}

impl From<OperationRepr> for Operation {
    fn from(repr: OperationRepr) -> Self {
        let result = match (repr.error, repr.response) {
            (Some(status), _) => Some(OperationResult::Error(status)),
            (None, Some(response)) => Some(OperationResult::Response(response)),
            (None, None) => None,
        };
        Operation {
            name: repr.name,
            metadata: repr.metadata,
            done: repr.done,
            result,
        }
    }
}

impl From<Operation> for OperationRepr {
    fn from(op: Operation) -> Self {
        let (error, response) = match op.result {
            Some(OperationResult::Error(status)) => (Some(status), None),
            Some(OperationResult::Response(value)) => (None, Some(value)),
            None => (None, None),
        };
        OperationRepr {
            name: op.name,
            metadata: op.metadata,
            done: op.done,
            error,
            response,
        }
    }
}

/// Polling config for [`OperationHandle::wait`].
pub struct PollOptions {
    /// Default: 5s.
    pub poll_interval: Duration,
    /// Default: 600s.
    pub timeout: Duration,
    /// Called after every poll with the refreshed operation.
    #[allow(clippy::type_complexity)]
    pub on_progress: Option<Box<dyn Fn(&Operation) + Send + Sync>>,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            timeout: Duration::from_secs(600),
            on_progress: None,
        }
    }
}

impl fmt::Debug for PollOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PollOptions")
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

/// A pollable handle to an operation whose successful result decodes to `T`.
pub struct OperationHandle<T> {
    operation: Operation,
    transport: Arc<dyn VideoStitcherTransport>,
    get: CallSettings,
    cancel: CallSettings,
    cancellation: CancellationToken,
    _result: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for OperationHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

impl<T: DeserializeOwned> OperationHandle<T> {
    pub(crate) fn new(
        operation: Operation,
        transport: Arc<dyn VideoStitcherTransport>,
        get: CallSettings,
        cancel: CallSettings,
    ) -> Self {
        // Polls follow the local token so `cancel` also abandons an in-flight refresh.
        let cancellation = get.cancellation.child_token();
        let get = CallSettings {
            cancellation: cancellation.clone(),
            ..get
        };
        Self {
            operation,
            transport,
            get,
            cancel,
            cancellation,
            _result: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.operation.name
    }

    pub fn done(&self) -> bool {
        self.operation.done
    }

    pub fn state(&self) -> OperationState {
        self.operation.state()
    }

    pub fn metadata(&self) -> Option<&OperationMetadata> {
        self.operation.metadata.as_ref()
    }

    /// The last operation snapshot received from the server.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// The terminal result, without any network I/O. `None` while in flight.
    pub fn result(&self) -> Option<Result<T>> {
        self.operation.decode()
    }

    /// Signal that stops local polling. Cancelling it does not abort the
    /// server-side task; use [`cancel`](Self::cancel) for that.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Refresh the operation once. A done operation is not fetched again.
    pub async fn poll(&mut self) -> Result<OperationState> {
        if self.operation.done {
            return Ok(self.operation.state());
        }

        let request = GetOperationRequest::new(self.operation.name.clone());
        let transport = &self.transport;
        let refreshed = self
            .get
            .invoke(|ctx| transport.get_operation(&request, ctx))
            .await?;

        self.operation = refreshed;
        let state = self.operation.state();
        debug!(operation = %self.operation.name, ?state, "polled operation");
        Ok(state)
    }

    /// Poll until the operation is done or `opts.timeout` elapses.
    ///
    /// # Errors
    ///
    /// - [`StitcherError::OperationFailed`] if the server reports a failure.
    /// - [`StitcherError::Timeout`] if the operation is still running at the deadline.
    /// - [`StitcherError::Cancelled`] if the cancellation token fires.
    pub async fn wait(&mut self, opts: Option<PollOptions>) -> Result<T> {
        let opts = opts.unwrap_or_default();
        let deadline = Instant::now() + opts.timeout;

        loop {
            if let Some(result) = self.operation.decode() {
                return result;
            }
            if self.cancellation.is_cancelled() {
                return Err(StitcherError::Cancelled);
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(StitcherError::Timeout(opts.timeout));
            }

            let nap = opts.poll_interval.min(deadline - now);
            tokio::select! {
                _ = self.cancellation.cancelled() => return Err(StitcherError::Cancelled),
                _ = tokio::time::sleep(nap) => {}
            }
            if Instant::now() >= deadline {
                return Err(StitcherError::Timeout(opts.timeout));
            }

            match tokio::time::timeout_at(deadline, self.poll()).await {
                Ok(polled) => {
                    polled?;
                }
                Err(_) => return Err(StitcherError::Timeout(opts.timeout)),
            };
            if let Some(ref cb) = opts.on_progress {
                cb(&self.operation);
            }
        }
    }

    /// Stop local polling and ask the server, best effort, to abort the task.
    ///
    /// The server may ignore the request; poll afterwards to learn the
    /// final state. An error here does not undo the local cancellation.
    pub async fn cancel(&self) -> Result<()> {
        self.cancellation.cancel();

        let request = CancelOperationRequest::new(self.operation.name.clone());
        let transport = &self.transport;
        self.cancel
            .invoke(|ctx| transport.cancel_operation(&request, ctx))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Code;
    use crate::models::CdnKey;
    use serde_json::json;

    #[test]
    fn decodes_wire_operation() {
        let op: Operation = serde_json::from_value(json!({
            "name": "projects/p/locations/l/operations/op-1",
            "metadata": {
                "@type": "type.googleapis.com/google.cloud.video.stitcher.v1.OperationMetadata",
                "createTime": "2024-01-01T00:00:00Z",
                "target": "projects/p/locations/l/cdnKeys/k",
                "verb": "create"
            },
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.cloud.video.stitcher.v1.CdnKey",
                "name": "projects/p/locations/l/cdnKeys/k",
                "hostname": "cdn.example.com"
            }
        }))
        .unwrap();

        assert_eq!(op.state(), OperationState::Succeeded);
        assert_eq!(op.metadata.as_ref().unwrap().verb, "create");
        let key: CdnKey = op.decode().unwrap().unwrap();
        assert_eq!(key.hostname, "cdn.example.com");
    }

    #[test]
    fn error_result_is_a_failed_state() {
        let op: Operation = serde_json::from_value(json!({
            "name": "projects/p/locations/l/operations/op-2",
            "done": true,
            "error": { "code": 6, "message": "slate already exists" }
        }))
        .unwrap();

        assert_eq!(op.state(), OperationState::Failed);
        match op.decode::<Empty>().unwrap().unwrap_err() {
            StitcherError::OperationFailed { name, status } => {
                assert_eq!(name, "projects/p/locations/l/operations/op-2");
                assert_eq!(status.code, Code::AlreadyExists);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn in_flight_states() {
        let mut op = Operation {
            name: "projects/p/locations/l/operations/op-3".into(),
            ..Default::default()
        };
        assert_eq!(op.state(), OperationState::Pending);
        assert!(op.decode::<Empty>().is_none());

        op.metadata = Some(OperationMetadata::default());
        assert_eq!(op.state(), OperationState::Running);
    }

    #[test]
    fn done_without_response_decodes_empty() {
        let op = Operation {
            name: "projects/p/locations/l/operations/op-4".into(),
            done: true,
            ..Default::default()
        };
        assert_eq!(op.decode::<Empty>().unwrap().unwrap(), Empty {});
    }
}
