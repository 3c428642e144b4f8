use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::{resolve_endpoint, ClientInfo, CredentialsConfig, TokenProvider, DEFAULT_HOST};
use crate::errors::Result;
use crate::models::*;
use crate::operation::{Empty, Operation, OperationHandle};
use crate::options::CallOptions;
use crate::pager::ItemPager;
use crate::resource;
use crate::retry::{CallSettings, MethodConfig, RetryPolicy, DEFAULT_TIMEOUT};
use crate::transport::{Method, RestTransport, VideoStitcherTransport};

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use video_stitcher::{ClientBuilder, RetryPolicy, StaticToken};
///
/// # fn example() -> video_stitcher::Result<()> {
/// let client = ClientBuilder::new()
///     .credentials(StaticToken::new("ya29.token"))
///     .quota_project("my-billing-project")
///     .timeout(Duration::from_secs(30))
///     .retry_policy(RetryPolicy::default().with_max_attempts(6))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    host: String,
    credentials: CredentialsConfig,
    timeout: Duration,
    retry: Option<RetryPolicy>,
    methods: HashMap<Method, MethodConfig>,
    client_info: ClientInfo,
    transport: Option<Arc<dyn VideoStitcherTransport>>,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            credentials: CredentialsConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            retry: Some(RetryPolicy::default()),
            methods: HashMap::new(),
            client_info: ClientInfo::new(),
            transport: None,
        }
    }

    /// Override the service host (defaults to `videostitcher.googleapis.com`).
    ///
    /// A bare host gets `https` and port 443; a full `http(s)://` URL is used as-is.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Use explicit credentials. Mutually exclusive with [`credentials_file`](Self::credentials_file).
    pub fn credentials(mut self, provider: impl TokenProvider + 'static) -> Self {
        self.credentials.credentials = Some(Arc::new(provider));
        self
    }

    /// Load credentials from a token file. Mutually exclusive with [`credentials`](Self::credentials).
    pub fn credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials.credentials_file = Some(path.into());
        self
    }

    /// Replace the default `cloud-platform` scope.
    pub fn scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.credentials.scopes = Some(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Project billed for quota, sent as `x-goog-user-project`.
    pub fn quota_project(mut self, project: impl Into<String>) -> Self {
        self.credentials.quota_project_id = Some(project.into());
        self
    }

    pub fn api_audience(mut self, audience: impl Into<String>) -> Self {
        self.credentials.api_audience = Some(audience.into());
        self
    }

    /// Default per-call timeout for every method (defaults to 60 seconds).
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Default retry policy for every method.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    /// Override the defaults of one method.
    pub fn method_config(mut self, method: Method, config: MethodConfig) -> Self {
        self.methods.insert(method, config);
        self
    }

    pub fn client_info(mut self, info: ClientInfo) -> Self {
        self.client_info = info;
        self
    }

    /// Use `transport` instead of the HTTP transport. Credentials are still
    /// checked for conflicts but not resolved.
    pub fn transport(mut self, transport: Arc<dyn VideoStitcherTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the [`Client`].
    ///
    /// If no credentials were configured, the builder reads the
    /// `VIDEO_STITCHER_ACCESS_TOKEN` environment variable.
    ///
    /// # Errors
    ///
    /// - [`StitcherError::Config`](crate::StitcherError::Config) if both
    ///   explicit credentials and a credentials file were given. Nothing is
    ///   sent over the network in that case.
    /// - [`StitcherError::Authentication`](crate::StitcherError::Authentication)
    ///   if no credentials are available.
    pub fn build(self) -> Result<Client> {
        self.credentials.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let credentials = self.credentials.resolve(&self.host)?;
                let endpoint = resolve_endpoint(&self.host);
                Arc::new(RestTransport::new(endpoint, credentials, self.client_info)?)
                    as Arc<dyn VideoStitcherTransport>
            }
        };

        let mut methods: HashMap<Method, MethodConfig> = Method::ALL
            .iter()
            .map(|&method| {
                let config = MethodConfig {
                    timeout: self.timeout,
                    retry: self.retry.clone(),
                };
                (method, config)
            })
            .collect();
        methods.extend(self.methods);

        debug!(host = %self.host, transport = transport.kind(), "client ready");
        Ok(Client {
            transport,
            methods: Arc::new(methods),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The Video Stitcher API client.
///
/// Cloning is cheap; clones share the transport.
///
/// # Example
///
/// ```no_run
/// use video_stitcher::{resource, Client, ListSlatesRequest};
///
/// # async fn example() -> video_stitcher::Result<()> {
/// let client = Client::new("ya29.token")?;
///
/// let parent = resource::location_path("my-project", "us-central1");
/// let mut slates = client.list_slates(ListSlatesRequest::new(parent), None)?;
/// while let Some(slate) = slates.next().await {
///     println!("{}", slate?.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    transport: Arc<dyn VideoStitcherTransport>,
    methods: Arc<HashMap<Method, MethodConfig>>,
}

impl Client {
    /// Create a client authenticated with a bearer token and default settings.
    ///
    /// For customization, use [`ClientBuilder`] instead.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new()
            .credentials(crate::auth::StaticToken::new(token))
            .build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn transport(&self) -> &Arc<dyn VideoStitcherTransport> {
        &self.transport
    }

    /// Release the transport's connections.
    ///
    /// Other clones share the transport; close only once no call is outstanding.
    pub async fn close(&self) {
        self.transport.close().await;
    }

    // -----------------------------------------------------------------------
    // CDN keys
    // -----------------------------------------------------------------------

    /// Create a CDN key. Resolves to the created key.
    pub async fn create_cdn_key(
        &self,
        request: CreateCdnKeyRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<CdnKey>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::CreateCdnKey, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.create_cdn_key(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    pub fn list_cdn_keys(
        &self,
        request: ListCdnKeysRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<CdnKey>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::ListCdnKeys, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListCdnKeysRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move { call.invoke(|ctx| transport.list_cdn_keys(&req, ctx)).await }
        }))
    }

    pub async fn get_cdn_key(
        &self,
        request: GetCdnKeyRequest,
        options: Option<CallOptions>,
    ) -> Result<CdnKey> {
        resource::CDN_KEY.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetCdnKey, options)
            .invoke(|ctx| transport.get_cdn_key(&request, ctx))
            .await
    }

    pub async fn delete_cdn_key(
        &self,
        request: DeleteCdnKeyRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<Empty>> {
        resource::CDN_KEY.validate(&request.name)?;
        let call = self.settings(Method::DeleteCdnKey, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.delete_cdn_key(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    /// Overwrite the fields named in `update_mask`. Resolves to the updated key.
    pub async fn update_cdn_key(
        &self,
        request: UpdateCdnKeyRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<CdnKey>> {
        resource::CDN_KEY.validate(&request.cdn_key.name)?;
        let call = self.settings(Method::UpdateCdnKey, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.update_cdn_key(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    // -----------------------------------------------------------------------
    // VOD sessions
    // -----------------------------------------------------------------------

    pub async fn create_vod_session(
        &self,
        request: CreateVodSessionRequest,
        options: Option<CallOptions>,
    ) -> Result<VodSession> {
        resource::LOCATION.validate(&request.parent)?;
        let transport = &self.transport;
        self.settings(Method::CreateVodSession, options)
            .invoke(|ctx| transport.create_vod_session(&request, ctx))
            .await
    }

    pub async fn get_vod_session(
        &self,
        request: GetVodSessionRequest,
        options: Option<CallOptions>,
    ) -> Result<VodSession> {
        resource::VOD_SESSION.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetVodSession, options)
            .invoke(|ctx| transport.get_vod_session(&request, ctx))
            .await
    }

    /// Stitching details of a VOD session, one per ad break.
    pub fn list_vod_stitch_details(
        &self,
        request: ListVodStitchDetailsRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<VodStitchDetail>> {
        resource::VOD_SESSION.validate(&request.parent)?;
        let call = self.settings(Method::ListVodStitchDetails, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListVodStitchDetailsRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move {
                call.invoke(|ctx| transport.list_vod_stitch_details(&req, ctx))
                    .await
            }
        }))
    }

    pub async fn get_vod_stitch_detail(
        &self,
        request: GetVodStitchDetailRequest,
        options: Option<CallOptions>,
    ) -> Result<VodStitchDetail> {
        resource::VOD_STITCH_DETAIL.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetVodStitchDetail, options)
            .invoke(|ctx| transport.get_vod_stitch_detail(&request, ctx))
            .await
    }

    pub fn list_vod_ad_tag_details(
        &self,
        request: ListVodAdTagDetailsRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<VodAdTagDetail>> {
        resource::VOD_SESSION.validate(&request.parent)?;
        let call = self.settings(Method::ListVodAdTagDetails, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListVodAdTagDetailsRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move {
                call.invoke(|ctx| transport.list_vod_ad_tag_details(&req, ctx))
                    .await
            }
        }))
    }

    pub async fn get_vod_ad_tag_detail(
        &self,
        request: GetVodAdTagDetailRequest,
        options: Option<CallOptions>,
    ) -> Result<VodAdTagDetail> {
        resource::VOD_AD_TAG_DETAIL.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetVodAdTagDetail, options)
            .invoke(|ctx| transport.get_vod_ad_tag_detail(&request, ctx))
            .await
    }

    // -----------------------------------------------------------------------
    // Live sessions
    // -----------------------------------------------------------------------

    pub fn list_live_ad_tag_details(
        &self,
        request: ListLiveAdTagDetailsRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<LiveAdTagDetail>> {
        resource::LIVE_SESSION.validate(&request.parent)?;
        let call = self.settings(Method::ListLiveAdTagDetails, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListLiveAdTagDetailsRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move {
                call.invoke(|ctx| transport.list_live_ad_tag_details(&req, ctx))
                    .await
            }
        }))
    }

    pub async fn get_live_ad_tag_detail(
        &self,
        request: GetLiveAdTagDetailRequest,
        options: Option<CallOptions>,
    ) -> Result<LiveAdTagDetail> {
        resource::LIVE_AD_TAG_DETAIL.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetLiveAdTagDetail, options)
            .invoke(|ctx| transport.get_live_ad_tag_detail(&request, ctx))
            .await
    }

    pub async fn create_live_session(
        &self,
        request: CreateLiveSessionRequest,
        options: Option<CallOptions>,
    ) -> Result<LiveSession> {
        resource::LOCATION.validate(&request.parent)?;
        let transport = &self.transport;
        self.settings(Method::CreateLiveSession, options)
            .invoke(|ctx| transport.create_live_session(&request, ctx))
            .await
    }

    pub async fn get_live_session(
        &self,
        request: GetLiveSessionRequest,
        options: Option<CallOptions>,
    ) -> Result<LiveSession> {
        resource::LIVE_SESSION.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetLiveSession, options)
            .invoke(|ctx| transport.get_live_session(&request, ctx))
            .await
    }

    // -----------------------------------------------------------------------
    // Slates
    // -----------------------------------------------------------------------

    /// Create a slate. Resolves to the created slate.
    pub async fn create_slate(
        &self,
        request: CreateSlateRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<Slate>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::CreateSlate, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.create_slate(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    pub fn list_slates(
        &self,
        request: ListSlatesRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<Slate>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::ListSlates, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListSlatesRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move { call.invoke(|ctx| transport.list_slates(&req, ctx)).await }
        }))
    }

    pub async fn get_slate(
        &self,
        request: GetSlateRequest,
        options: Option<CallOptions>,
    ) -> Result<Slate> {
        resource::SLATE.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetSlate, options)
            .invoke(|ctx| transport.get_slate(&request, ctx))
            .await
    }

    pub async fn update_slate(
        &self,
        request: UpdateSlateRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<Slate>> {
        resource::SLATE.validate(&request.slate.name)?;
        let call = self.settings(Method::UpdateSlate, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.update_slate(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    pub async fn delete_slate(
        &self,
        request: DeleteSlateRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<Empty>> {
        resource::SLATE.validate(&request.name)?;
        let call = self.settings(Method::DeleteSlate, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.delete_slate(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    // -----------------------------------------------------------------------
    // Live configs
    // -----------------------------------------------------------------------

    pub async fn create_live_config(
        &self,
        request: CreateLiveConfigRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<LiveConfig>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::CreateLiveConfig, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.create_live_config(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    pub fn list_live_configs(
        &self,
        request: ListLiveConfigsRequest,
        options: Option<CallOptions>,
    ) -> Result<ItemPager<LiveConfig>> {
        resource::LOCATION.validate(&request.parent)?;
        let call = self.settings(Method::ListLiveConfigs, options);
        let transport = self.transport.clone();
        Ok(ItemPager::new(request, move |req: ListLiveConfigsRequest| {
            let transport = transport.clone();
            let call = call.clone();
            async move { call.invoke(|ctx| transport.list_live_configs(&req, ctx)).await }
        }))
    }

    pub async fn get_live_config(
        &self,
        request: GetLiveConfigRequest,
        options: Option<CallOptions>,
    ) -> Result<LiveConfig> {
        resource::LIVE_CONFIG.validate(&request.name)?;
        let transport = &self.transport;
        self.settings(Method::GetLiveConfig, options)
            .invoke(|ctx| transport.get_live_config(&request, ctx))
            .await
    }

    pub async fn delete_live_config(
        &self,
        request: DeleteLiveConfigRequest,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<Empty>> {
        resource::LIVE_CONFIG.validate(&request.name)?;
        let call = self.settings(Method::DeleteLiveConfig, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.delete_live_config(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Resume an operation by name, e.g. one started by another process.
    pub async fn get_operation<T: DeserializeOwned>(
        &self,
        name: impl Into<String>,
        options: Option<CallOptions>,
    ) -> Result<OperationHandle<T>> {
        let request = GetOperationRequest::new(name);
        resource::OPERATION.validate(&request.name)?;
        let call = self.settings(Method::GetOperation, options);
        let transport = &self.transport;
        let operation = call
            .invoke(|ctx| transport.get_operation(&request, ctx))
            .await?;
        Ok(self.operation_handle(operation, &call))
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn settings(&self, method: Method, options: Option<CallOptions>) -> CallSettings {
        match self.methods.get(&method) {
            Some(config) => CallSettings::resolve(method, config, options),
            None => CallSettings::resolve(method, &MethodConfig::default(), options),
        }
    }

    /// Polls inherit the starting call's metadata and cancellation, but use
    /// the `GetOperation` / `CancelOperation` timeouts and retry policies.
    fn operation_handle<T: DeserializeOwned>(
        &self,
        operation: Operation,
        call: &CallSettings,
    ) -> OperationHandle<T> {
        let follow_up = CallOptions {
            metadata: call.metadata.as_ref().clone(),
            cancellation: Some(call.cancellation.clone()),
            ..CallOptions::default()
        };
        debug!(operation = %operation.name, method = %call.method, "operation started");
        OperationHandle::new(
            operation,
            self.transport.clone(),
            self.settings(Method::GetOperation, Some(follow_up.clone())),
            self.settings(Method::CancelOperation, Some(follow_up)),
        )
    }
}
