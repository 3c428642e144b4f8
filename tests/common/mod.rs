#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use video_stitcher::*;

pub const PARENT: &str = "projects/my-project/locations/us-central1";

/// In-memory transport that serves scripted answers and records every call.
#[derive(Debug, Default)]
pub struct StubTransport {
    calls: Mutex<Vec<Method>>,
    metadata: Mutex<Vec<Vec<(String, String)>>>,
    get_slate: Mutex<VecDeque<Result<Slate>>>,
    get_slate_delay: Mutex<Option<Duration>>,
    get_operation_delay: Mutex<Option<Duration>>,
    slate_pages: Mutex<HashMap<String, ListSlatesResponse>>,
    operations: Mutex<VecDeque<Operation>>,
    cancelled: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answers for successive `get_slate` calls; a found slate once exhausted.
    pub fn script_get_slate(&self, answers: Vec<Result<Slate>>) {
        self.get_slate.lock().unwrap().extend(answers);
    }

    pub fn delay_get_slate(&self, delay: Duration) {
        *self.get_slate_delay.lock().unwrap() = Some(delay);
    }

    pub fn delay_get_operation(&self, delay: Duration) {
        *self.get_operation_delay.lock().unwrap() = Some(delay);
    }

    pub fn add_slate_page(&self, token: &str, slates: &[&str], next_page_token: &str) {
        let page = ListSlatesResponse {
            slates: slates.iter().map(|id| slate(id)).collect(),
            next_page_token: next_page_token.to_string(),
            unreachable: Vec::new(),
        };
        self.slate_pages
            .lock()
            .unwrap()
            .insert(token.to_string(), page);
    }

    /// Snapshots returned by successive `get_operation` calls. The last one
    /// repeats forever.
    pub fn script_operations(&self, snapshots: Vec<Operation>) {
        self.operations.lock().unwrap().extend(snapshots);
    }

    pub fn count(&self, method: Method) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|&&m| m == method)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Metadata seen by each call, in call order.
    pub fn metadata(&self) -> Vec<Vec<(String, String)>> {
        self.metadata.lock().unwrap().clone()
    }

    pub fn cancelled(&self) -> Vec<String> {
        self.cancelled.lock().unwrap().clone()
    }

    fn record(&self, method: Method, ctx: &CallContext) {
        self.calls.lock().unwrap().push(method);
        self.metadata
            .lock()
            .unwrap()
            .push(ctx.metadata.as_ref().clone());
    }
}

#[async_trait]
impl VideoStitcherTransport for StubTransport {
    fn kind(&self) -> &'static str {
        "stub"
    }

    async fn get_slate(&self, request: &GetSlateRequest, ctx: CallContext) -> Result<Slate> {
        self.record(Method::GetSlate, &ctx);
        let delay = *self.get_slate_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let answer = self.get_slate.lock().unwrap().pop_front();
        answer.unwrap_or_else(|| {
            Ok(Slate {
                name: request.name.clone(),
                uri: "https://storage.googleapis.com/bucket/slate.mp4".into(),
                gam_slate: None,
            })
        })
    }

    async fn list_slates(
        &self,
        request: &ListSlatesRequest,
        ctx: CallContext,
    ) -> Result<ListSlatesResponse> {
        self.record(Method::ListSlates, &ctx);
        self.slate_pages
            .lock()
            .unwrap()
            .get(&request.page_token)
            .cloned()
            .ok_or_else(|| Status::new(Code::InvalidArgument, "unknown page token").into())
    }

    async fn create_slate(&self, request: &CreateSlateRequest, ctx: CallContext) -> Result<Operation> {
        self.record(Method::CreateSlate, &ctx);
        Ok(pending_operation(&format!("create-{}", request.slate_id)))
    }

    async fn delete_slate(&self, request: &DeleteSlateRequest, ctx: CallContext) -> Result<Operation> {
        self.record(Method::DeleteSlate, &ctx);
        let id = request.name.rsplit('/').next().unwrap_or_default();
        Ok(pending_operation(&format!("delete-{id}")))
    }

    async fn get_operation(&self, request: &GetOperationRequest, ctx: CallContext) -> Result<Operation> {
        self.record(Method::GetOperation, &ctx);
        let delay = *self.get_operation_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let mut operations = self.operations.lock().unwrap();
        let snapshot = if operations.len() > 1 {
            operations.pop_front()
        } else {
            operations.front().cloned()
        };
        snapshot.ok_or_else(|| {
            Status::new(Code::NotFound, format!("{} not found", request.name)).into()
        })
    }

    async fn cancel_operation(&self, request: &CancelOperationRequest, ctx: CallContext) -> Result<Empty> {
        self.record(Method::CancelOperation, &ctx);
        self.cancelled.lock().unwrap().push(request.name.clone());
        Ok(Empty {})
    }
}

pub fn client(stub: &Arc<StubTransport>) -> Client {
    ClientBuilder::new()
        .transport(stub.clone())
        .build()
        .expect("stub client")
}

pub fn slate(id: &str) -> Slate {
    Slate {
        name: format!("{PARENT}/slates/{id}"),
        uri: format!("https://storage.googleapis.com/bucket/{id}.mp4"),
        gam_slate: None,
    }
}

pub fn operation_name(id: &str) -> String {
    format!("{PARENT}/operations/{id}")
}

pub fn pending_operation(id: &str) -> Operation {
    Operation {
        name: operation_name(id),
        ..Default::default()
    }
}

pub fn running_operation(id: &str) -> Operation {
    Operation {
        name: operation_name(id),
        metadata: Some(OperationMetadata {
            verb: "create".into(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn succeeded_operation(id: &str, response: &Slate) -> Operation {
    let mut packed = serde_json::to_value(response).expect("slate encodes");
    packed["@type"] = json!("type.googleapis.com/google.cloud.video.stitcher.v1.Slate");
    Operation {
        done: true,
        result: Some(OperationResult::Response(packed)),
        ..running_operation(id)
    }
}

pub fn failed_operation(id: &str, status: Status) -> Operation {
    Operation {
        done: true,
        result: Some(OperationResult::Error(status)),
        ..running_operation(id)
    }
}

pub fn unavailable(message: &str) -> StitcherError {
    Status::new(Code::Unavailable, message).into()
}
