use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::VideoStitcherTransport;
use crate::auth::{ClientInfo, ResolvedCredentials};
use crate::errors::{Code, Result, Status, StitcherError};
use crate::models::*;
use crate::operation::{Empty, Operation};
use crate::options::CallContext;

/// HTTP/1.1 + JSON transport over the service's REST bindings.
///
/// Safe to share across tasks behind an `Arc`.
#[derive(Debug)]
pub struct RestTransport {
    base_url: String,
    http: RwLock<Option<reqwest::Client>>,
    credentials: ResolvedCredentials,
    client_info: ClientInfo,
}

impl RestTransport {
    /// `base_url` is a scheme + authority such as `https://videostitcher.googleapis.com:443`.
    pub fn new(
        base_url: impl Into<String>,
        credentials: ResolvedCredentials,
        client_info: ClientInfo,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(client_info.user_agent_header())
            .build()
            .map_err(StitcherError::Http)?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: RwLock::new(Some(http)),
            credentials,
            client_info,
        })
    }

    /// Send one request and decode the JSON answer.
    ///
    /// Non-2xx answers become [`StitcherError::Status`]; network failures
    /// stay [`StitcherError::Http`]. The call deadline is enforced by the
    /// caller, so no reqwest timeout is set here.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        ctx: &CallContext,
    ) -> Result<T> {
        let http = self
            .http
            .read()
            .await
            .clone()
            .ok_or_else(|| StitcherError::Transport("transport is closed".into()))?;

        let url = format!("{}/v1/{}", self.base_url, path);
        let headers = self.headers(ctx).await?;

        let mut req = http.request(method.clone(), &url).headers(headers);
        let query: Vec<&(&str, String)> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !query.is_empty() {
            req = req.query(&query);
        }
        if let Some(ref b) = body {
            req = req.header(CONTENT_TYPE, "application/json").json(b);
        }

        debug!(%method, %url, "sending HTTP request");
        let response = req.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
            return Ok(serde_json::from_str(text)?);
        }

        Err(error_from_response(status.as_u16(), &text).into())
    }

    async fn headers(&self, ctx: &CallContext) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let token = self
            .credentials
            .provider
            .token(&self.credentials.scopes)
            .await?;
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {token}"))?);
        headers.insert(
            HeaderName::from_static("x-goog-api-client"),
            header_value(&self.client_info.api_client_header())?,
        );
        headers.insert(USER_AGENT, header_value(&self.client_info.user_agent_header())?);
        if let Some(ref project) = self.credentials.quota_project_id {
            headers.insert(
                HeaderName::from_static("x-goog-user-project"),
                header_value(project)?,
            );
        }

        for (key, value) in ctx.metadata.iter() {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                StitcherError::Config(format!("invalid metadata key {key:?}: {e}"))
            })?;
            headers.append(name, header_value(value)?);
        }

        Ok(headers)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, ctx: &CallContext) -> Result<T> {
        self.execute(reqwest::Method::GET, path, &[], None, ctx).await
    }

    async fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        ctx: &CallContext,
    ) -> Result<T> {
        self.execute(reqwest::Method::GET, path, query, None, ctx).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str, ctx: &CallContext) -> Result<T> {
        self.execute(reqwest::Method::DELETE, path, &[], None, ctx).await
    }

    async fn send<B: Serialize, T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        query: &[(&str, String)],
        body: &B,
        ctx: &CallContext,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.execute(method, path, query, Some(body), ctx).await
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| StitcherError::Config(format!("invalid header value: {e}")))
}

fn paging(page_size: i32, page_token: &str) -> Vec<(&'static str, String)> {
    let size = if page_size > 0 {
        page_size.to_string()
    } else {
        String::new()
    };
    vec![("pageSize", size), ("pageToken", page_token.to_string())]
}

/// `{"error": {"code": 404, "message": "...", "status": "NOT_FOUND", "details": [...]}}`
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<serde_json::Value>,
}

fn error_from_response(http_status: u16, text: &str) -> Status {
    match serde_json::from_str::<ErrorEnvelope>(text) {
        Ok(ErrorEnvelope { error }) => {
            let code = error
                .status
                .as_deref()
                .and_then(Code::from_name)
                .unwrap_or_else(|| {
                    Code::from_http(if error.code != 0 { error.code } else { http_status })
                });
            Status {
                code,
                message: error.message,
                details: error.details,
            }
        }
        Err(_) => Status::new(Code::from_http(http_status), text.to_string()),
    }
}

#[async_trait]
impl VideoStitcherTransport for RestTransport {
    fn kind(&self) -> &'static str {
        "rest"
    }

    async fn close(&self) {
        self.http.write().await.take();
    }

    async fn create_cdn_key(&self, request: &CreateCdnKeyRequest, ctx: CallContext) -> Result<Operation> {
        let path = format!("{}/cdnKeys", request.parent);
        let query = [("cdnKeyId", request.cdn_key_id.clone())];
        self.send(reqwest::Method::POST, &path, &query, &request.cdn_key, &ctx)
            .await
    }

    async fn list_cdn_keys(&self, request: &ListCdnKeysRequest, ctx: CallContext) -> Result<ListCdnKeysResponse> {
        let mut query = paging(request.page_size, &request.page_token);
        query.push(("filter", request.filter.clone()));
        query.push(("orderBy", request.order_by.clone()));
        self.list(&format!("{}/cdnKeys", request.parent), &query, &ctx)
            .await
    }

    async fn get_cdn_key(&self, request: &GetCdnKeyRequest, ctx: CallContext) -> Result<CdnKey> {
        self.get(&request.name, &ctx).await
    }

    async fn delete_cdn_key(&self, request: &DeleteCdnKeyRequest, ctx: CallContext) -> Result<Operation> {
        self.delete(&request.name, &ctx).await
    }

    async fn update_cdn_key(&self, request: &UpdateCdnKeyRequest, ctx: CallContext) -> Result<Operation> {
        let query = [("updateMask", request.update_mask.join(","))];
        self.send(
            reqwest::Method::PATCH,
            &request.cdn_key.name,
            &query,
            &request.cdn_key,
            &ctx,
        )
        .await
    }

    async fn create_vod_session(&self, request: &CreateVodSessionRequest, ctx: CallContext) -> Result<VodSession> {
        let path = format!("{}/vodSessions", request.parent);
        self.send(reqwest::Method::POST, &path, &[], &request.vod_session, &ctx)
            .await
    }

    async fn get_vod_session(&self, request: &GetVodSessionRequest, ctx: CallContext) -> Result<VodSession> {
        self.get(&request.name, &ctx).await
    }

    async fn list_vod_stitch_details(
        &self,
        request: &ListVodStitchDetailsRequest,
        ctx: CallContext,
    ) -> Result<ListVodStitchDetailsResponse> {
        let query = paging(request.page_size, &request.page_token);
        self.list(&format!("{}/vodStitchDetails", request.parent), &query, &ctx)
            .await
    }

    async fn get_vod_stitch_detail(
        &self,
        request: &GetVodStitchDetailRequest,
        ctx: CallContext,
    ) -> Result<VodStitchDetail> {
        self.get(&request.name, &ctx).await
    }

    async fn list_vod_ad_tag_details(
        &self,
        request: &ListVodAdTagDetailsRequest,
        ctx: CallContext,
    ) -> Result<ListVodAdTagDetailsResponse> {
        let query = paging(request.page_size, &request.page_token);
        self.list(&format!("{}/vodAdTagDetails", request.parent), &query, &ctx)
            .await
    }

    async fn get_vod_ad_tag_detail(
        &self,
        request: &GetVodAdTagDetailRequest,
        ctx: CallContext,
    ) -> Result<VodAdTagDetail> {
        self.get(&request.name, &ctx).await
    }

    async fn list_live_ad_tag_details(
        &self,
        request: &ListLiveAdTagDetailsRequest,
        ctx: CallContext,
    ) -> Result<ListLiveAdTagDetailsResponse> {
        let query = paging(request.page_size, &request.page_token);
        self.list(&format!("{}/liveAdTagDetails", request.parent), &query, &ctx)
            .await
    }

    async fn get_live_ad_tag_detail(
        &self,
        request: &GetLiveAdTagDetailRequest,
        ctx: CallContext,
    ) -> Result<LiveAdTagDetail> {
        self.get(&request.name, &ctx).await
    }

    async fn create_slate(&self, request: &CreateSlateRequest, ctx: CallContext) -> Result<Operation> {
        let path = format!("{}/slates", request.parent);
        let query = [("slateId", request.slate_id.clone())];
        self.send(reqwest::Method::POST, &path, &query, &request.slate, &ctx)
            .await
    }

    async fn list_slates(&self, request: &ListSlatesRequest, ctx: CallContext) -> Result<ListSlatesResponse> {
        let mut query = paging(request.page_size, &request.page_token);
        query.push(("filter", request.filter.clone()));
        query.push(("orderBy", request.order_by.clone()));
        self.list(&format!("{}/slates", request.parent), &query, &ctx)
            .await
    }

    async fn get_slate(&self, request: &GetSlateRequest, ctx: CallContext) -> Result<Slate> {
        self.get(&request.name, &ctx).await
    }

    async fn update_slate(&self, request: &UpdateSlateRequest, ctx: CallContext) -> Result<Operation> {
        let query = [("updateMask", request.update_mask.join(","))];
        self.send(
            reqwest::Method::PATCH,
            &request.slate.name,
            &query,
            &request.slate,
            &ctx,
        )
        .await
    }

    async fn delete_slate(&self, request: &DeleteSlateRequest, ctx: CallContext) -> Result<Operation> {
        self.delete(&request.name, &ctx).await
    }

    async fn create_live_session(
        &self,
        request: &CreateLiveSessionRequest,
        ctx: CallContext,
    ) -> Result<LiveSession> {
        let path = format!("{}/liveSessions", request.parent);
        self.send(reqwest::Method::POST, &path, &[], &request.live_session, &ctx)
            .await
    }

    async fn get_live_session(&self, request: &GetLiveSessionRequest, ctx: CallContext) -> Result<LiveSession> {
        self.get(&request.name, &ctx).await
    }

    async fn create_live_config(
        &self,
        request: &CreateLiveConfigRequest,
        ctx: CallContext,
    ) -> Result<Operation> {
        let path = format!("{}/liveConfigs", request.parent);
        let query = [("liveConfigId", request.live_config_id.clone())];
        self.send(reqwest::Method::POST, &path, &query, &request.live_config, &ctx)
            .await
    }

    async fn list_live_configs(
        &self,
        request: &ListLiveConfigsRequest,
        ctx: CallContext,
    ) -> Result<ListLiveConfigsResponse> {
        let mut query = paging(request.page_size, &request.page_token);
        query.push(("filter", request.filter.clone()));
        query.push(("orderBy", request.order_by.clone()));
        self.list(&format!("{}/liveConfigs", request.parent), &query, &ctx)
            .await
    }

    async fn get_live_config(&self, request: &GetLiveConfigRequest, ctx: CallContext) -> Result<LiveConfig> {
        self.get(&request.name, &ctx).await
    }

    async fn delete_live_config(
        &self,
        request: &DeleteLiveConfigRequest,
        ctx: CallContext,
    ) -> Result<Operation> {
        self.delete(&request.name, &ctx).await
    }

    async fn get_operation(&self, request: &GetOperationRequest, ctx: CallContext) -> Result<Operation> {
        self.get(&request.name, &ctx).await
    }

    async fn cancel_operation(&self, request: &CancelOperationRequest, ctx: CallContext) -> Result<Empty> {
        let path = format!("{}:cancel", request.name);
        self.send(reqwest::Method::POST, &path, &[], &Empty {}, &ctx)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PARENT: &str = "projects/my-project/locations/us-central1";

    fn transport(server: &MockServer, quota_project: Option<&str>) -> RestTransport {
        let credentials = ResolvedCredentials {
            provider: Arc::new(StaticToken::new("test-token")),
            scopes: vec!["https://www.googleapis.com/auth/cloud-platform".into()],
            quota_project_id: quota_project.map(str::to_string),
            audience: server.uri(),
        };
        let info = ClientInfo {
            library_version: "0.0.1".into(),
            user_agent: None,
        };
        RestTransport::new(server.uri(), credentials, info).unwrap()
    }

    #[tokio::test]
    async fn create_slate_posts_body_and_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/v1/{PARENT}/slates")))
            .and(query_param("slateId", "my-slate"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("x-goog-api-client", "gl-rust gccl/0.0.1"))
            .and(header("x-goog-user-project", "billing"))
            .and(body_json(json!({ "uri": "https://storage.googleapis.com/b/slate.mp4" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("{PARENT}/operations/op-1"),
                "done": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let request = CreateSlateRequest {
            parent: PARENT.into(),
            slate_id: "my-slate".into(),
            slate: Slate::new("https://storage.googleapis.com/b/slate.mp4"),
        };
        let op = transport(&server, Some("billing"))
            .create_slate(&request, CallContext::default())
            .await
            .unwrap();

        assert_eq!(op.name, format!("{PARENT}/operations/op-1"));
        assert!(!op.done);
    }

    #[tokio::test]
    async fn list_sends_paging_and_call_metadata() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/{PARENT}/cdnKeys")))
            .and(query_param("pageSize", "2"))
            .and(query_param("pageToken", "abc"))
            .and(header("x-request-reason", "audit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cdnKeys": [
                    { "name": format!("{PARENT}/cdnKeys/a"), "hostname": "a.example.com" },
                    { "name": format!("{PARENT}/cdnKeys/b"), "hostname": "b.example.com" }
                ],
                "nextPageToken": "def"
            })))
            .mount(&server)
            .await;

        let request = ListCdnKeysRequest {
            parent: PARENT.into(),
            page_size: 2,
            page_token: "abc".into(),
            ..Default::default()
        };
        let ctx = CallContext {
            metadata: Arc::new(vec![("x-request-reason".into(), "audit".into())]),
            ..CallContext::default()
        };
        let page = transport(&server, None)
            .list_cdn_keys(&request, ctx)
            .await
            .unwrap();

        assert_eq!(page.cdn_keys.len(), 2);
        assert_eq!(page.cdn_keys[1].hostname, "b.example.com");
        assert_eq!(page.next_page_token, "def");
    }

    #[tokio::test]
    async fn error_envelope_maps_to_status() {
        let server = MockServer::start().await;
        let name = format!("{PARENT}/slates/missing");

        Mock::given(method("GET"))
            .and(path(format!("/v1/{name}")))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "code": 404,
                    "message": "Slate not found",
                    "status": "NOT_FOUND"
                }
            })))
            .mount(&server)
            .await;

        let err = transport(&server, None)
            .get_slate(&GetSlateRequest::new(name), CallContext::default())
            .await
            .unwrap_err();

        match err {
            StitcherError::Status(status) => {
                assert_eq!(status.code, Code::NotFound);
                assert_eq!(status.message, "Slate not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_text_error_falls_back_to_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream connect error"))
            .mount(&server)
            .await;

        let err = transport(&server, None)
            .get_cdn_key(
                &GetCdnKeyRequest::new(format!("{PARENT}/cdnKeys/k")),
                CallContext::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), Some(Code::Unavailable));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn cancel_operation_posts_to_custom_verb() {
        let server = MockServer::start().await;
        let name = format!("{PARENT}/operations/op-9");

        Mock::given(method("POST"))
            .and(path(format!("/v1/{name}:cancel")))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .expect(1)
            .mount(&server)
            .await;

        let empty = transport(&server, None)
            .cancel_operation(&CancelOperationRequest::new(name), CallContext::default())
            .await
            .unwrap();
        assert_eq!(empty, Empty {});
    }

    #[tokio::test]
    async fn update_sends_mask_and_patch() {
        let server = MockServer::start().await;
        let name = format!("{PARENT}/cdnKeys/k");

        Mock::given(method("PATCH"))
            .and(path(format!("/v1/{name}")))
            .and(query_param("updateMask", "hostname"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": format!("{PARENT}/operations/op-2"),
                "done": true,
                "response": { "name": name, "hostname": "new.example.com" }
            })))
            .mount(&server)
            .await;

        let mut cdn_key = CdnKey::new("new.example.com");
        cdn_key.name = name.clone();
        let op = transport(&server, None)
            .update_cdn_key(
                &UpdateCdnKeyRequest {
                    cdn_key,
                    update_mask: vec!["hostname".into()],
                },
                CallContext::default(),
            )
            .await
            .unwrap();

        let key: CdnKey = op.decode().unwrap().unwrap();
        assert_eq!(key.hostname, "new.example.com");
    }

    #[tokio::test]
    async fn slow_response_is_a_local_deadline_error() {
        let server = MockServer::start().await;
        let name = format!("{PARENT}/slates/slow");

        Mock::given(method("GET"))
            .and(path(format!("/v1/{name}")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "name": name, "uri": "https://example.com/s.mp4" }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let client = crate::client::ClientBuilder::new()
            .transport(Arc::new(transport(&server, None)))
            .build()
            .unwrap();
        let timeout = Duration::from_millis(300);
        let started = std::time::Instant::now();
        let err = client
            .get_slate(
                GetSlateRequest::new(name),
                Some(crate::options::CallOptions::new().timeout(timeout)),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, StitcherError::Timeout(d) if d == timeout), "{err:?}");
        assert!(!err.is_retryable());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn closed_transport_rejects_calls() {
        let server = MockServer::start().await;
        let transport = transport(&server, None);
        transport.close().await;

        let err = transport
            .get_slate(
                &GetSlateRequest::new(format!("{PARENT}/slates/s")),
                CallContext::new(Some(Duration::from_secs(1))),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StitcherError::Transport(ref m) if m.contains("closed")));
        assert_eq!(transport.kind(), "rest");
    }
}
